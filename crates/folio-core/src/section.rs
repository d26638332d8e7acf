#![forbid(unsafe_code)]

//! Section identity and layout handles.
//!
//! A [`SectionHandle`] pairs a [`SectionId`] with the host's layout object so
//! trackers can read a section's position live. Handles are cheap to clone and
//! are shared between the registry and anyone who looked one up; when the
//! registry detaches a handle (unmount or overwrite), every clone starts
//! answering `None` instead of reading a dead layout.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::geometry::Bounds;

/// Opaque, stable key for one registrable section.
///
/// Cloning is a reference-count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct SectionId(Arc<str>);

impl SectionId {
    /// Create an id from any string.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id could name a DOM element: non-empty, no whitespace.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({:?})", &*self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<SectionId> for String {
    fn from(value: SectionId) -> Self {
        value.0.to_string()
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Host-side layout object for a mounted section.
///
/// Positions are CSS pixels in document space (distance from the document
/// top). Implementations read the live layout on every call; the engine never
/// caches them across frames.
pub trait SectionLayout {
    /// Distance of the section's top edge from the document top.
    fn top_offset(&self) -> f64;

    /// Rendered height of the section.
    fn height(&self) -> f64;

    /// Top edge and height together.
    fn bounds(&self) -> Bounds {
        Bounds::new(self.top_offset(), self.height())
    }
}

/// A [`SectionLayout`] whose bounds are pushed by the host.
///
/// Hosts that measure elements themselves (or tests) keep a clone and call
/// [`set_bounds`](Self::set_bounds) after every relayout.
#[derive(Debug, Clone, Default)]
pub struct MeasuredLayout {
    bounds: Rc<Cell<Bounds>>,
}

impl MeasuredLayout {
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds: Rc::new(Cell::new(bounds)),
        }
    }

    /// Replace the measured bounds. Every clone observes the update.
    pub fn set_bounds(&self, bounds: Bounds) {
        self.bounds.set(bounds);
    }
}

impl SectionLayout for MeasuredLayout {
    fn top_offset(&self) -> f64 {
        self.bounds.get().top
    }

    fn height(&self) -> f64 {
        self.bounds.get().height
    }

    fn bounds(&self) -> Bounds {
        self.bounds.get()
    }
}

/// Shared attachment slot. `None` once the registry detached the handle.
struct HandleSlot {
    layout: RefCell<Option<Rc<dyn SectionLayout>>>,
}

/// Registry-owned handle to a mounted section's layout.
///
/// # Invariants
///
/// 1. All clones share one attachment slot.
/// 2. After [`detach`](Self::detach), every query returns `None`.
#[derive(Clone)]
pub struct SectionHandle {
    id: SectionId,
    slot: Rc<HandleSlot>,
}

impl SectionHandle {
    /// Attach a new handle for `id` to a live layout.
    #[must_use]
    pub fn new(id: SectionId, layout: Rc<dyn SectionLayout>) -> Self {
        Self {
            id,
            slot: Rc::new(HandleSlot {
                layout: RefCell::new(Some(layout)),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Live top offset, or `None` if the section has been detached.
    #[must_use]
    pub fn top_offset(&self) -> Option<f64> {
        self.slot.layout.borrow().as_ref().map(|l| l.top_offset())
    }

    /// Live bounds, or `None` if the section has been detached.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.slot.layout.borrow().as_ref().map(|l| l.bounds())
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.slot.layout.borrow().is_some()
    }

    /// Whether this handle reads from exactly `layout`.
    #[must_use]
    pub fn reads_from(&self, layout: &Rc<dyn SectionLayout>) -> bool {
        self.slot
            .layout
            .borrow()
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, layout))
    }

    /// Drop the layout reference. Idempotent.
    pub(crate) fn detach(&self) {
        self.slot.layout.borrow_mut().take();
    }
}

impl fmt::Debug for SectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionHandle")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}
