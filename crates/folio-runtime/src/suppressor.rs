#![forbid(unsafe_code)]

//! Programmatic-scroll suppression.
//!
//! When the navigation rail asks for a smooth scroll, the page moves on its
//! own for a while. Scroll and intersection signals produced by that motion
//! must not fight the user's choice, so [`ProgrammaticScrollSuppressor`] opens
//! a [`SuppressionWindow`] at the click and keeps it open until the page has
//! been quiet for `quiet_period`. Every scroll tick inside the window pushes
//! the expiry out (debounce). Hover is never suppressed; that gate lives in
//! the arbiter.

use core::time::Duration;

use tracing::debug;

use crate::timer::Deadline;

/// An open suppression window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuppressionWindow {
    pub opened_at: Duration,
    pub expires_at: Duration,
}

/// Flags scroll motion caused by the engine's own navigation.
#[derive(Debug, Clone)]
pub struct ProgrammaticScrollSuppressor {
    quiet_period: Duration,
    opened_at: Option<Duration>,
    close: Deadline,
}

impl ProgrammaticScrollSuppressor {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            opened_at: None,
            close: Deadline::new(),
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Open (or restart) the window at `now`.
    pub fn begin(&mut self, now: Duration) {
        let restarted = self.close.is_armed();
        self.opened_at = Some(now);
        self.close.arm(now + self.quiet_period);
        debug!(target: "folio.suppressor", restarted, expires_at_ms = (now + self.quiet_period).as_millis() as u64, "suppression window opened");
    }

    /// A scroll tick at `now`. Extends an open window; ignored otherwise.
    pub fn note_scroll(&mut self, now: Duration) {
        if self.is_suppressed(now) {
            self.close.extend_to(now + self.quiet_period);
        }
    }

    /// Whether ambient signals are suppressed at `now`.
    #[must_use]
    pub fn is_suppressed(&self, now: Duration) -> bool {
        self.close.fire_at().is_some_and(|at| now < at)
    }

    /// The open window, if any (it may already be past its expiry but not yet
    /// polled).
    #[must_use]
    pub fn window(&self) -> Option<SuppressionWindow> {
        Some(SuppressionWindow {
            opened_at: self.opened_at?,
            expires_at: self.close.fire_at()?,
        })
    }

    /// Close the window if it expired by `now`. Returns `true` on the poll
    /// that closes it.
    ///
    /// The expiry is re-read at fire time, so a window extended after it was
    /// scheduled stays open.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.close.fire_if_due(now) {
            return false;
        }
        let opened_at = self.opened_at.take();
        debug!(
            target: "folio.suppressor",
            open_ms = opened_at.map_or(0, |at| now.saturating_sub(at).as_millis() as u64),
            "suppression window closed"
        );
        true
    }

    /// Close immediately without reporting.
    pub fn cancel(&mut self) {
        self.close.cancel();
        self.opened_at = None;
    }
}

impl Default for ProgrammaticScrollSuppressor {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}
