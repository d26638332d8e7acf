#![forbid(unsafe_code)]

//! Read models for the page: how each section looks, and which rail entry is
//! lit.
//!
//! Both are pure functions of the published [`ActiveState`] plus a little
//! rail-local state (the optimistic click highlight and the hovered button).
//! Neither writes back into the engine.

use folio_core::{ActiveState, SectionId};

/// Visual treatment of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionVisual {
    /// This section is active: lifted and fully opaque.
    Active,
    /// Another section is active: faded back.
    Dimmed,
    /// Nothing is active.
    Resting,
}

impl SectionVisual {
    #[must_use]
    pub fn for_section(state: &ActiveState, id: &SectionId) -> Self {
        match state.active_id() {
            Some(active) if active == id => Self::Active,
            Some(_) => Self::Dimmed,
            None => Self::Resting,
        }
    }

    #[must_use]
    pub const fn opacity(self) -> f32 {
        match self {
            Self::Dimmed => 0.4,
            Self::Active | Self::Resting => 1.0,
        }
    }

    #[must_use]
    pub const fn scale(self) -> f32 {
        match self {
            Self::Active => 1.02,
            Self::Dimmed | Self::Resting => 1.0,
        }
    }

    #[must_use]
    pub const fn blur_px(self) -> f32 {
        match self {
            Self::Dimmed => 2.0,
            Self::Active | Self::Resting => 0.0,
        }
    }
}

/// One button on the navigation rail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: SectionId,
    pub label: &'static str,
    /// Downloads a file instead of scrolling to a section.
    pub is_download: bool,
}

impl NavEntry {
    fn section(id: &str, label: &'static str) -> Self {
        Self {
            id: SectionId::from(id),
            label,
            is_download: false,
        }
    }
}

/// What the host should do for a rail click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Scroll to the section (feed it to the engine as a navigation request).
    Navigate(SectionId),
    /// Start the resume download. The engine is not involved.
    Download,
}

/// How a rail button should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntryStyle {
    Highlighted,
    Hovered,
    Plain,
}

/// Navigation rail state.
#[derive(Debug, Clone)]
pub struct NavRail {
    entries: Vec<NavEntry>,
    highlighted: SectionId,
    hovered: Option<SectionId>,
}

impl Default for NavRail {
    fn default() -> Self {
        Self::new()
    }
}

impl NavRail {
    /// The site's rail: four sections and the resume download.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![
                NavEntry::section("home", "Home"),
                NavEntry::section("profile", "Profile"),
                NavEntry::section("experience", "Experience"),
                NavEntry::section("contact", "Contact"),
                NavEntry {
                    id: SectionId::from("resume"),
                    label: "Resume",
                    is_download: true,
                },
            ],
            highlighted: SectionId::from("home"),
            hovered: None,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    #[must_use]
    pub fn highlighted(&self) -> &SectionId {
        &self.highlighted
    }

    /// Follow a state transition. Idle falls back to `home`.
    pub fn sync(&mut self, state: &ActiveState) {
        self.highlighted = state
            .active_id()
            .cloned()
            .unwrap_or_else(|| SectionId::from("home"));
    }

    /// A click on `id`. Section entries are highlighted at once, ahead of the
    /// engine's next transition. Unknown ids do nothing.
    pub fn click(&mut self, id: &SectionId) -> Option<NavAction> {
        let entry = self.entries.iter().find(|e| &e.id == id)?;
        if entry.is_download {
            return Some(NavAction::Download);
        }
        self.highlighted = entry.id.clone();
        Some(NavAction::Navigate(entry.id.clone()))
    }

    /// Pointer over a rail button (`None` when it leaves the rail).
    pub fn hover(&mut self, id: Option<SectionId>) {
        self.hovered = id;
    }

    #[must_use]
    pub fn style_of(&self, id: &SectionId) -> NavEntryStyle {
        if &self.highlighted == id {
            NavEntryStyle::Highlighted
        } else if self.hovered.as_ref() == Some(id) {
            NavEntryStyle::Hovered
        } else {
            NavEntryStyle::Plain
        }
    }
}
