#![forbid(unsafe_code)]

//! Runtime: the trackers, the arbiter, and the host-driven engine.
//!
//! # Role in Folio
//! `folio-runtime` decides which single section of the page is active. Three
//! signal sources compete (scroll position, band intersection, pointer hover)
//! and the page's own smooth scrolling must not feed back into them.
//!
//! # Pipeline
//! ```text
//! scroll ticks ──► FrameCoalescer ──► IntersectionTracker ──┐
//!                                 └─► ScrollPositionTracker ─┤
//! pointer enter/leave ──► HoverIntentTracker ────────────────┼─► ActiveSectionArbiter ──► Observable<ActiveState>
//! nav click ──► ProgrammaticScrollSuppressor (gate) ─────────┘
//! ```
//!
//! [`SectionSpy`] wires the pipeline together; the individual components are
//! public for hosts that need to drive them separately.

pub mod arbiter;
pub mod config;
pub mod hover;
pub mod intersection;
pub mod reactive;
pub mod scroll_position;
pub mod spy;
pub mod suppressor;
pub mod timer;

pub use arbiter::{ActiveSectionArbiter, ArbiterLogEntry, ArbiterOutcome, IgnoredReason};
pub use config::{ConfigError, SpyConfig};
pub use hover::HoverIntentTracker;
pub use intersection::IntersectionTracker;
pub use reactive::{Observable, Subscription};
pub use reactive::observable::ObservableReader;
pub use scroll_position::ScrollPositionTracker;
pub use spy::{FrameReport, ScrollRequest, SectionSpy, SpyCommand};
pub use suppressor::{ProgrammaticScrollSuppressor, SuppressionWindow};
pub use timer::{Deadline, TimerToken};
