#![forbid(unsafe_code)]

//! Core: section identity, layout handles, geometry, and the section registry.
//!
//! # Role in Folio
//! `folio-core` is the data layer of the active-section engine. It owns the
//! types every other crate speaks in: which sections exist, where they sit on
//! the page, and which typed events flow toward the arbiter.
//!
//! # Primary responsibilities
//! - **SectionId / SectionHandle**: stable keys and self-invalidating layout
//!   handles for mounted sections.
//! - **SectionRegistry**: the live, ordered set of trackable sections.
//! - **Geometry**: document-space bounds, the viewport, and the observation band.
//! - **SectionEvent / ActiveState**: the typed vocabulary of the arbiter.
//! - **FrameCoalescer**: folds scroll/resize ticks down to one per frame.
//!
//! # How it fits in the system
//! `folio-runtime` consumes these types to run the trackers and the arbiter;
//! `folio-web` feeds them from a browser host.

pub mod event;
pub mod frame_coalescer;
pub mod geometry;
pub mod registry;
pub mod section;

pub use event::{ActiveSource, ActiveState, SectionEvent};
pub use frame_coalescer::{FrameCoalescer, FrameInput};
pub use geometry::{BandInsets, Bounds, Viewport};
pub use registry::{DEFAULT_DOCUMENT_ORDER, SectionRegistry};
pub use section::{MeasuredLayout, SectionHandle, SectionId, SectionLayout};
