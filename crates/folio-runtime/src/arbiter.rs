#![forbid(unsafe_code)]

//! The active-section arbiter.
//!
//! [`ActiveSectionArbiter`] is the only writer of the published
//! [`ActiveState`]. Trackers hand it typed [`SectionEvent`]s; it resolves them
//! with a fixed precedence table:
//!
//! | Event               | Accepted when                                    | Result                    |
//! |---------------------|--------------------------------------------------|---------------------------|
//! | `HoverStart(id)`    | always                                           | `ActiveVia(Hover, id)`    |
//! | `HoverEnd(id)`      | active source is Hover and active id is `id`     | `Idle`                    |
//! | `Enter(id)`         | not suppressed, source is not Hover              | `ActiveVia(Intersection, id)` |
//! | `Exit(id)`          | never                                            | no change                 |
//! | `ScrollResolved(id)`| not suppressed, source is not Hover, id differs  | `ActiveVia(Scroll, id)`   |
//!
//! Before any of that, events naming a malformed or unregistered section are
//! ignored and logged, so the arbiter never activates an id the registry does
//! not hold.
//!
//! # Invariants
//!
//! 1. At most one section is active.
//! 2. A non-idle state names a registered section (after [`revalidate`]).
//! 3. Every dispatch yields exactly one [`ArbiterOutcome`] and one log entry.
//!
//! [`revalidate`]: ActiveSectionArbiter::revalidate

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use folio_core::{ActiveSource, ActiveState, SectionEvent, SectionRegistry};

use crate::reactive::observable::{Observable, ObservableReader, Subscription};

/// Why the arbiter declined an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Id cannot name a section (empty or contains whitespace).
    MalformedSection,
    /// Id is not in the registry.
    UnknownSection,
    /// A programmatic scroll is in progress.
    Suppressed,
    /// Hover holds the active state.
    HoverHeld,
    /// Hover end for a section that no longer holds hover.
    StaleHoverEnd,
    /// Exits never clear the active state.
    ExitNeverClears,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbiterOutcome {
    Transitioned { from: ActiveState, to: ActiveState },
    Unchanged,
    Ignored(IgnoredReason),
}

impl ArbiterOutcome {
    #[must_use]
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// One dispatch, as recorded in the arbiter's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterLogEntry {
    pub sequence: u64,
    pub event: SectionEvent,
    pub suppressed: bool,
    pub outcome: ArbiterOutcome,
}

/// Single authority over which section is active.
#[derive(Debug)]
pub struct ActiveSectionArbiter {
    state: Observable<ActiveState>,
    log: VecDeque<ArbiterLogEntry>,
    log_capacity: usize,
    next_sequence: u64,
}

impl ActiveSectionArbiter {
    /// Arbiter starting `Idle`, keeping the last `log_capacity` dispatches.
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            state: Observable::new(ActiveState::Idle),
            log: VecDeque::with_capacity(log_capacity.min(1024)),
            log_capacity,
            next_sequence: 1,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ActiveState {
        self.state.get()
    }

    /// Read-only handle for observers.
    #[must_use]
    pub fn reader(&self) -> ObservableReader<ActiveState> {
        self.state.reader()
    }

    /// Push every future transition to `callback`.
    pub fn subscribe(&self, callback: impl Fn(&ActiveState) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }

    /// Number of transitions so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Recent dispatches, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &ArbiterLogEntry> {
        self.log.iter()
    }

    /// Resolve one event against the current state.
    ///
    /// `suppressed` is the suppressor's answer at the time of dispatch.
    pub fn dispatch(
        &mut self,
        event: SectionEvent,
        registry: &SectionRegistry,
        suppressed: bool,
    ) -> ArbiterOutcome {
        let outcome = self.resolve(&event, registry, suppressed);
        self.record(event, suppressed, outcome.clone());
        outcome
    }

    /// Drop an active id that is no longer registered.
    pub fn revalidate(&mut self, registry: &SectionRegistry) -> ArbiterOutcome {
        let current = self.state.get();
        match current.active_id() {
            Some(id) if !registry.contains(id) => {
                debug!(target: "folio.arbiter", section = %id, "active section unregistered; clearing");
                self.transition(current.clone(), ActiveState::Idle)
            }
            _ => ArbiterOutcome::Unchanged,
        }
    }

    /// Back to `Idle`, as on page reload.
    pub fn reset(&mut self) {
        self.state.set(ActiveState::Idle);
        self.log.clear();
    }

    fn resolve(
        &mut self,
        event: &SectionEvent,
        registry: &SectionRegistry,
        suppressed: bool,
    ) -> ArbiterOutcome {
        let id = event.section();
        if !id.is_well_formed() {
            warn!(target: "folio.arbiter", event = event.kind(), section = ?id.as_str(), "ignoring event for malformed section id");
            return ArbiterOutcome::Ignored(IgnoredReason::MalformedSection);
        }
        if !registry.contains(id) {
            warn!(target: "folio.arbiter", event = event.kind(), section = %id, "ignoring event for unregistered section");
            return ArbiterOutcome::Ignored(IgnoredReason::UnknownSection);
        }

        let current = self.state.get();
        let next = match event {
            SectionEvent::HoverStart(id) => ActiveState::via(ActiveSource::Hover, id.clone()),
            SectionEvent::HoverEnd(id) => {
                if current.is_hover() && current.is_active(id) {
                    ActiveState::Idle
                } else {
                    return self.ignore(event, IgnoredReason::StaleHoverEnd);
                }
            }
            SectionEvent::Enter(id) => {
                if let Some(reason) = ambient_gate(&current, suppressed) {
                    return self.ignore(event, reason);
                }
                ActiveState::via(ActiveSource::Intersection, id.clone())
            }
            SectionEvent::Exit(_) => return self.ignore(event, IgnoredReason::ExitNeverClears),
            SectionEvent::ScrollResolved(id) => {
                if let Some(reason) = ambient_gate(&current, suppressed) {
                    return self.ignore(event, reason);
                }
                if current.is_active(id) {
                    return ArbiterOutcome::Unchanged;
                }
                ActiveState::via(ActiveSource::Scroll, id.clone())
            }
        };

        if next == current {
            return ArbiterOutcome::Unchanged;
        }
        self.transition(current, next)
    }

    fn ignore(&self, event: &SectionEvent, reason: IgnoredReason) -> ArbiterOutcome {
        trace!(target: "folio.arbiter", event = event.kind(), section = %event.section(), ?reason, "event ignored");
        ArbiterOutcome::Ignored(reason)
    }

    fn transition(&mut self, from: ActiveState, to: ActiveState) -> ArbiterOutcome {
        debug!(
            target: "folio.arbiter",
            from = %from,
            to = %to,
            source = to.source().map_or("none", ActiveSource::as_str),
            "active section changed"
        );
        self.state.set(to.clone());
        ArbiterOutcome::Transitioned { from, to }
    }

    fn record(&mut self, event: SectionEvent, suppressed: bool, outcome: ArbiterOutcome) {
        if self.log_capacity == 0 {
            return;
        }
        if self.log.len() == self.log_capacity {
            self.log.pop_front();
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.log.push_back(ArbiterLogEntry {
            sequence,
            event,
            suppressed,
            outcome,
        });
    }
}

impl Default for ActiveSectionArbiter {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Shared gate for intersection and scroll signals.
fn ambient_gate(current: &ActiveState, suppressed: bool) -> Option<IgnoredReason> {
    if suppressed {
        Some(IgnoredReason::Suppressed)
    } else if current.is_hover() {
        Some(IgnoredReason::HoverHeld)
    } else {
        None
    }
}
