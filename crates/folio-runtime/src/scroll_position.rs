#![forbid(unsafe_code)]

//! Scroll-offset resolution.
//!
//! Picks the section sitting under the sticky header: the last section, in
//! document order, whose top edge is at or above `scroll_y + header_offset`.
//! When none qualifies (scrolled above the first section's top) the first
//! section wins.

use folio_core::{SectionEvent, SectionId, SectionRegistry};

/// Resolves a scroll offset to a section.
#[derive(Debug, Clone)]
pub struct ScrollPositionTracker {
    header_offset_px: f64,
    last_resolved: Option<SectionId>,
}

impl ScrollPositionTracker {
    #[must_use]
    pub fn new(header_offset_px: f64) -> Self {
        Self {
            header_offset_px,
            last_resolved: None,
        }
    }

    #[must_use]
    pub fn header_offset_px(&self) -> f64 {
        self.header_offset_px
    }

    /// Section picked by the most recent [`resolve`](Self::resolve).
    #[must_use]
    pub fn last_resolved(&self) -> Option<&SectionId> {
        self.last_resolved.as_ref()
    }

    /// Pure lookup: which section sits under `reference_offset`.
    ///
    /// Detached handles are skipped. Returns `None` only for an empty
    /// registry.
    #[must_use]
    pub fn section_at(registry: &SectionRegistry, reference_offset: f64) -> Option<SectionId> {
        let handles = registry.all();
        handles
            .iter()
            .rev()
            .find(|h| h.top_offset().is_some_and(|top| top <= reference_offset))
            .or_else(|| handles.first())
            .map(|h| h.id().clone())
    }

    /// Resolve one scroll tick.
    pub fn resolve(&mut self, registry: &SectionRegistry, scroll_y: f64) -> Option<SectionEvent> {
        let id = Self::section_at(registry, scroll_y + self.header_offset_px)?;
        self.last_resolved = Some(id.clone());
        Some(SectionEvent::ScrollResolved(id))
    }
}

impl Default for ScrollPositionTracker {
    fn default() -> Self {
        Self::new(150.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Bounds, MeasuredLayout, SectionLayout};
    use std::rc::Rc;

    fn layout(top: f64) -> Rc<dyn SectionLayout> {
        Rc::new(MeasuredLayout::new(Bounds::new(top, 800.0)))
    }

    fn site() -> SectionRegistry {
        let mut registry = SectionRegistry::new();
        for (id, top) in [("home", 0.0), ("profile", 800.0), ("experience", 1600.0), ("contact", 2400.0)] {
            registry.register(id.into(), layout(top));
        }
        registry
    }

    fn resolved(event: Option<SectionEvent>) -> Option<String> {
        match event {
            Some(SectionEvent::ScrollResolved(id)) => Some(id.to_string()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reference_offset_1700_is_experience() {
        let registry = site();
        assert_eq!(
            ScrollPositionTracker::section_at(&registry, 1700.0).map(String::from),
            Some("experience".to_string())
        );
        // scroll 1550 + header 150 = 1700.
        let mut tracker = ScrollPositionTracker::default();
        assert_eq!(resolved(tracker.resolve(&registry, 1550.0)).as_deref(), Some("experience"));
        assert_eq!(tracker.last_resolved().map(SectionId::as_str), Some("experience"));
    }

    #[test]
    fn top_edge_exactly_at_offset_counts() {
        let registry = site();
        assert_eq!(
            ScrollPositionTracker::section_at(&registry, 800.0).map(String::from),
            Some("profile".to_string())
        );
    }

    #[test]
    fn defaults_to_first_section_when_none_qualify() {
        let mut registry = SectionRegistry::new();
        registry.register("profile".into(), layout(800.0));
        registry.register("experience".into(), layout(1600.0));
        let mut tracker = ScrollPositionTracker::default();
        assert_eq!(resolved(tracker.resolve(&registry, 0.0)).as_deref(), Some("profile"));
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = SectionRegistry::new();
        let mut tracker = ScrollPositionTracker::default();
        assert!(tracker.resolve(&registry, 500.0).is_none());
        assert!(tracker.last_resolved().is_none());
    }

    #[test]
    fn past_the_last_top_resolves_last() {
        let registry = site();
        assert_eq!(
            ScrollPositionTracker::section_at(&registry, 99_999.0).map(String::from),
            Some("contact".to_string())
        );
    }
}
