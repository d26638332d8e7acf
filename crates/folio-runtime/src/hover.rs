#![forbid(unsafe_code)]

//! Hover intent: pointer enter/leave with a grace delay.
//!
//! Pointer enter is reported immediately as [`SectionEvent::HoverStart`].
//! Pointer leave is not: it arms a per-section grace [`Deadline`], and only if
//! that deadline passes without any re-entry does the tracker report
//! [`SectionEvent::HoverEnd`]. A pointer crossing an internal boundary (leave
//! then enter within the grace) therefore never produces a clear.
//!
//! # Invariants
//!
//! 1. At most one grace deadline per section; a new leave re-arms it.
//! 2. Any pointer enter cancels every pending clear.
//! 3. `HoverEnd(id)` is emitted at most once per leave.

use core::time::Duration;

use ahash::AHashMap;
use tracing::trace;

use folio_core::{SectionEvent, SectionId};

use crate::timer::Deadline;

/// Pending clear for one section.
#[derive(Debug, Clone, Default)]
struct HoverGrace {
    deadline: Deadline,
}

impl HoverGrace {
    fn pending_clear(&self) -> bool {
        self.deadline.is_armed()
    }
}

/// Debounces pointer enter/leave into hover intent.
#[derive(Debug, Clone)]
pub struct HoverIntentTracker {
    grace: Duration,
    pending: AHashMap<SectionId, HoverGrace>,
    /// Section the pointer is physically over, if any.
    inside: Option<SectionId>,
}

impl HoverIntentTracker {
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            pending: AHashMap::new(),
            inside: None,
        }
    }

    #[must_use]
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Section currently under the pointer, ignoring grace.
    #[must_use]
    pub fn pointer_inside(&self) -> Option<&SectionId> {
        self.inside.as_ref()
    }

    /// Whether a clear is pending for `id`.
    #[must_use]
    pub fn has_pending_clear(&self, id: &SectionId) -> bool {
        self.pending.get(id).is_some_and(HoverGrace::pending_clear)
    }

    /// Earliest pending grace expiry.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().filter_map(|g| g.deadline.fire_at()).min()
    }

    /// Pointer entered `id`.
    ///
    /// Drops every grace, expired or not. Call [`Self::poll`] first to report
    /// clears that came due before the enter.
    pub fn pointer_enter(&mut self, id: SectionId) -> SectionEvent {
        for (pending_id, grace) in &mut self.pending {
            if grace.pending_clear() {
                trace!(target: "folio.hover", section = %pending_id, entered = %id, "pending clear cancelled by re-entry");
            }
            grace.deadline.cancel();
        }
        self.pending.clear();
        self.inside = Some(id.clone());
        SectionEvent::HoverStart(id)
    }

    /// Pointer left `id` at `now`. Arms (or re-arms) its grace deadline.
    pub fn pointer_leave(&mut self, id: SectionId, now: Duration) {
        if self.inside.as_ref() == Some(&id) {
            self.inside = None;
        }
        let grace = self.pending.entry(id).or_default();
        grace.deadline.arm(now + self.grace);
    }

    /// Drop any pending clear for `id` (section unmounting).
    pub fn cancel(&mut self, id: &SectionId) {
        if let Some(mut grace) = self.pending.remove(id) {
            grace.deadline.cancel();
        }
        if self.inside.as_ref() == Some(id) {
            self.inside = None;
        }
    }

    /// Report every grace that expired by `now`, in id order.
    pub fn poll(&mut self, now: Duration) -> Vec<SectionEvent> {
        let mut expired: Vec<SectionId> = self
            .pending
            .iter_mut()
            .filter_map(|(id, grace)| grace.deadline.fire_if_due(now).then(|| id.clone()))
            .collect();
        self.pending.retain(|_, grace| grace.pending_clear());
        expired.sort();
        expired.into_iter().map(SectionEvent::HoverEnd).collect()
    }
}

impl Default for HoverIntentTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn id(s: &str) -> SectionId {
        SectionId::from(s)
    }

    #[test]
    fn enter_emits_hover_start_immediately() {
        let mut tracker = HoverIntentTracker::default();
        assert_eq!(tracker.pointer_enter(id("profile")), SectionEvent::HoverStart(id("profile")));
        assert_eq!(tracker.pointer_inside(), Some(&id("profile")));
    }

    #[test]
    fn leave_clears_only_after_grace() {
        let mut tracker = HoverIntentTracker::default();
        tracker.pointer_enter(id("profile"));
        tracker.pointer_leave(id("profile"), ms(1000));
        assert!(tracker.has_pending_clear(&id("profile")));
        assert!(tracker.pointer_inside().is_none());

        assert!(tracker.poll(ms(1099)).is_empty());
        assert_eq!(tracker.poll(ms(1100)), vec![SectionEvent::HoverEnd(id("profile"))]);
        assert!(tracker.poll(ms(5000)).is_empty());
        assert!(!tracker.has_pending_clear(&id("profile")));
    }

    #[test]
    fn reentry_same_section_cancels_clear() {
        let mut tracker = HoverIntentTracker::default();
        tracker.pointer_enter(id("home"));
        tracker.pointer_leave(id("home"), ms(0));
        tracker.pointer_enter(id("home"));
        assert!(tracker.poll(ms(500)).is_empty());
    }

    #[test]
    fn entering_another_section_cancels_clear() {
        let mut tracker = HoverIntentTracker::default();
        tracker.pointer_enter(id("home"));
        tracker.pointer_leave(id("home"), ms(0));
        tracker.pointer_enter(id("profile"));
        assert!(!tracker.has_pending_clear(&id("home")));
        assert!(tracker.poll(ms(500)).is_empty());
    }

    #[test]
    fn second_leave_replaces_stale_timer() {
        let mut tracker = HoverIntentTracker::default();
        tracker.pointer_leave(id("home"), ms(0));
        tracker.pointer_leave(id("home"), ms(80));
        assert!(tracker.poll(ms(100)).is_empty());
        assert_eq!(tracker.poll(ms(180)), vec![SectionEvent::HoverEnd(id("home"))]);
    }

    #[test]
    fn cancel_drops_pending_clear() {
        let mut tracker = HoverIntentTracker::default();
        tracker.pointer_enter(id("home"));
        tracker.pointer_leave(id("home"), ms(0));
        tracker.cancel(&id("home"));
        assert!(tracker.poll(ms(500)).is_empty());
        assert_eq!(tracker.next_deadline(), None);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut tracker = HoverIntentTracker::new(ms(50));
        tracker.pointer_leave(id("b"), ms(30));
        tracker.pointer_leave(id("a"), ms(10));
        assert_eq!(tracker.next_deadline(), Some(ms(60)));
        assert_eq!(
            tracker.poll(ms(100)),
            vec![SectionEvent::HoverEnd(id("a")), SectionEvent::HoverEnd(id("b"))]
        );
    }
}
