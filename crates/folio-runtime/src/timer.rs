#![forbid(unsafe_code)]

//! Host-driven, cancellable deadlines.
//!
//! The engine never sleeps and never reads the wall clock. A [`Deadline`] is a
//! single scheduled task slot: it is armed with an absolute monotonic time and
//! checked by the frame driver with [`Deadline::fire_if_due`].
//!
//! Each scheduling site owns its own `Deadline`. Re-arming replaces the
//! previous schedule, so two timers for the same logical wait can never be in
//! flight at once. Every arm bumps a generation so a [`TimerToken`] taken
//! earlier can be checked for staleness.

use core::time::Duration;

/// Identifies one arming of a [`Deadline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    generation: u64,
}

/// One cancellable scheduled task.
///
/// # Invariants
///
/// 1. At most one pending fire time.
/// 2. `fire_if_due` reports a given arming at most once.
/// 3. `cancel` and re-arming invalidate every earlier [`TimerToken`].
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Duration>,
    generation: u64,
}

impl Deadline {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            at: None,
            generation: 0,
        }
    }

    /// Schedule for `at`, replacing any pending schedule.
    pub fn arm(&mut self, at: Duration) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.at = Some(at);
        TimerToken {
            generation: self.generation,
        }
    }

    /// Push a pending schedule later. Never moves it earlier; does nothing if
    /// the deadline is not armed.
    pub fn extend_to(&mut self, at: Duration) {
        if let Some(current) = self.at.as_mut() {
            *current = (*current).max(at);
        }
    }

    /// Drop the pending schedule, if any.
    pub fn cancel(&mut self) {
        if self.at.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Pending fire time.
    #[must_use]
    pub const fn fire_at(&self) -> Option<Duration> {
        self.at
    }

    /// Whether `token` still names the pending schedule.
    #[must_use]
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.at.is_some() && self.generation == token.generation
    }

    /// Whether the deadline has passed at `now`, without consuming it.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.at.is_some_and(|at| now >= at)
    }

    /// Consume the schedule if it is due. Returns `true` exactly once per
    /// arming.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.at = None;
            true
        } else {
            false
        }
    }
}
