#![forbid(unsafe_code)]

//! Typed events consumed by the arbiter, and the state it publishes.

use std::fmt;

use crate::section::SectionId;

/// One signal from a tracker, addressed to the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionEvent {
    /// Pointer intent settled on a section.
    HoverStart(SectionId),
    /// Hover grace expired without re-entry.
    HoverEnd(SectionId),
    /// Section started intersecting the observation band.
    Enter(SectionId),
    /// Section stopped intersecting the observation band.
    Exit(SectionId),
    /// Scroll position resolved to a section.
    ScrollResolved(SectionId),
}

impl SectionEvent {
    /// The section this event refers to.
    #[must_use]
    pub fn section(&self) -> &SectionId {
        match self {
            Self::HoverStart(id)
            | Self::HoverEnd(id)
            | Self::Enter(id)
            | Self::Exit(id)
            | Self::ScrollResolved(id) => id,
        }
    }

    /// Stable lowercase name, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HoverStart(_) => "hover_start",
            Self::HoverEnd(_) => "hover_end",
            Self::Enter(_) => "enter",
            Self::Exit(_) => "exit",
            Self::ScrollResolved(_) => "scroll_resolved",
        }
    }
}

/// Which signal made the current section active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveSource {
    Hover,
    Intersection,
    Scroll,
}

impl ActiveSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Intersection => "intersection",
            Self::Scroll => "scroll",
        }
    }
}

impl fmt::Display for ActiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single shared field of truth: which section is active, and why.
///
/// `Idle` stands for "no active id, no source".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveState {
    #[default]
    Idle,
    ActiveVia {
        source: ActiveSource,
        id: SectionId,
    },
}

impl ActiveState {
    #[must_use]
    pub fn via(source: ActiveSource, id: SectionId) -> Self {
        Self::ActiveVia { source, id }
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&SectionId> {
        match self {
            Self::Idle => None,
            Self::ActiveVia { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<ActiveSource> {
        match self {
            Self::Idle => None,
            Self::ActiveVia { source, .. } => Some(*source),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether `id` is the active section.
    #[must_use]
    pub fn is_active(&self, id: &SectionId) -> bool {
        self.active_id() == Some(id)
    }

    #[must_use]
    pub fn is_hover(&self) -> bool {
        self.source() == Some(ActiveSource::Hover)
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::ActiveVia { source, id } => write!(f, "{id} via {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_no_id_or_source() {
        let state = ActiveState::default();
        assert!(state.is_idle());
        assert_eq!(state.active_id(), None);
        assert_eq!(state.source(), None);
        assert_eq!(state.to_string(), "idle");
    }

    #[test]
    fn active_state_accessors() {
        let state = ActiveState::via(ActiveSource::Hover, "profile".into());
        assert_eq!(state.active_id().map(SectionId::as_str), Some("profile"));
        assert!(state.is_hover());
        assert!(state.is_active(&"profile".into()));
        assert!(!state.is_active(&"home".into()));
        assert_eq!(state.to_string(), "profile via hover");
    }

    #[test]
    fn event_section_and_kind() {
        let ev = SectionEvent::ScrollResolved("contact".into());
        assert_eq!(ev.section(), &SectionId::from("contact"));
        assert_eq!(ev.kind(), "scroll_resolved");
    }
}
