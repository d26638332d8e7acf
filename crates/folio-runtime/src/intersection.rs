#![forbid(unsafe_code)]

//! Viewport-band intersection tracking.
//!
//! [`IntersectionTracker`] plays the role of an intersection observer with a
//! `rootMargin` of `-20% 0px -60% 0px`: a section counts as "in" while any part
//! of it overlaps the band between 20% and 40% of the viewport height. Each
//! observation pass compares the current overlap against the previous pass and
//! reports the differences as [`SectionEvent::Enter`] / [`SectionEvent::Exit`].
//!
//! # Subscription
//!
//! The tracker follows the registry's generation. When the handle set changes
//! it re-subscribes: sections that disappeared are forgotten silently, sections
//! seen for the first time get an initial entry (an `Enter` if they already
//! overlap the band, nothing otherwise). Sections observed before keep their
//! state, so a re-subscribe never replays an `Enter` for a section that was
//! already in.
//!
//! The tracker records overlap, not acceptance. An `Enter` the arbiter
//! ignores (suppression, a held hover) is not replayed on a later pass; the
//! section comes back through scroll resolution, which the engine re-runs when
//! suppression closes or a hover clears.

use ahash::AHashSet;
use tracing::trace;

use folio_core::{BandInsets, SectionEvent, SectionId, SectionRegistry, Viewport};

/// Emits enter/exit events for the observation band.
#[derive(Debug, Clone)]
pub struct IntersectionTracker {
    insets: BandInsets,
    /// Registry generation the current subscription was built from.
    observed_generation: Option<u64>,
    /// Sections under observation.
    observed: AHashSet<SectionId>,
    /// Sections overlapping the band as of the last pass.
    intersecting: AHashSet<SectionId>,
}

impl IntersectionTracker {
    #[must_use]
    pub fn new(insets: BandInsets) -> Self {
        Self {
            insets,
            observed_generation: None,
            observed: AHashSet::new(),
            intersecting: AHashSet::new(),
        }
    }

    #[must_use]
    pub fn insets(&self) -> BandInsets {
        self.insets
    }

    /// Whether `id` overlapped the band on the last pass.
    #[must_use]
    pub fn is_intersecting(&self, id: &SectionId) -> bool {
        self.intersecting.contains(id)
    }

    /// Whether the registry changed since the last pass.
    #[must_use]
    pub fn needs_resubscribe(&self, registry: &SectionRegistry) -> bool {
        self.observed_generation != Some(registry.generation())
    }

    /// Stop tracking one section without emitting anything.
    pub fn forget(&mut self, id: &SectionId) {
        self.observed.remove(id);
        self.intersecting.remove(id);
    }

    /// Drop the subscription entirely; the next pass starts fresh.
    pub fn disconnect(&mut self) {
        self.observed_generation = None;
        self.observed.clear();
        self.intersecting.clear();
    }

    /// Run one observation pass. Events come out in document order.
    pub fn observe(&mut self, registry: &SectionRegistry, viewport: Viewport) -> Vec<SectionEvent> {
        if self.needs_resubscribe(registry) {
            self.resubscribe(registry);
        }

        let band = viewport.band(self.insets);
        let mut events = Vec::new();
        for handle in registry.all() {
            let id = handle.id();
            let now_in = handle.bounds().is_some_and(|b| b.intersects(&band));
            let first_seen = self.observed.insert(id.clone());
            let was_in = self.intersecting.contains(id);

            match (was_in, now_in) {
                (false, true) => {
                    self.intersecting.insert(id.clone());
                    events.push(SectionEvent::Enter(id.clone()));
                }
                (true, false) => {
                    self.intersecting.remove(id);
                    events.push(SectionEvent::Exit(id.clone()));
                }
                _ => {}
            }
            if first_seen {
                trace!(target: "folio.intersection", section = %id, intersecting = now_in, "initial entry");
            }
        }
        events
    }

    fn resubscribe(&mut self, registry: &SectionRegistry) {
        self.observed.retain(|id| registry.contains(id));
        self.intersecting.retain(|id| registry.contains(id));
        self.observed_generation = Some(registry.generation());
        trace!(
            target: "folio.intersection",
            generation = registry.generation(),
            observed = self.observed.len(),
            "resubscribed"
        );
    }
}

impl Default for IntersectionTracker {
    fn default() -> Self {
        Self::new(BandInsets::default())
    }
}
