#![forbid(unsafe_code)]

//! The live set of trackable sections.
//!
//! # Design
//!
//! [`SectionRegistry`] owns one [`SectionHandle`] per mounted section. It is an
//! explicitly owned object passed by reference to the trackers; nothing
//! captures it ambiently.
//!
//! Ordering is document order: ids listed in the declared order come first (in
//! that order), any other id follows in first-registration order.
//!
//! # Invariants
//!
//! 1. At most one handle per id.
//! 2. A handle removed or replaced is detached before it leaves the registry.
//! 3. `generation` increases on every change to the handle set, and only then.
//!
//! # Failure Modes
//!
//! None are errors. Unregistering an unknown id is a no-op; registering an id
//! twice overwrites (last write wins); malformed ids are refused with a warning.

use std::rc::Rc;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::section::{SectionHandle, SectionId, SectionLayout};

/// Sections of the site, top to bottom.
pub const DEFAULT_DOCUMENT_ORDER: [&str; 4] = ["home", "profile", "experience", "contact"];

#[derive(Debug)]
struct Entry {
    handle: SectionHandle,
    /// Registration sequence number, orders ids outside the declared order.
    seq: u64,
}

/// Ordered registry of mounted sections.
#[derive(Debug)]
pub struct SectionRegistry {
    document_order: Vec<SectionId>,
    entries: AHashMap<SectionId, Entry>,
    next_seq: u64,
    generation: u64,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::with_order(DEFAULT_DOCUMENT_ORDER.iter().copied().map(SectionId::from))
    }
}

impl SectionRegistry {
    /// Registry with the default document order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with an explicit document order. Duplicate ids keep their
    /// first position.
    #[must_use]
    pub fn with_order(order: impl IntoIterator<Item = SectionId>) -> Self {
        let mut document_order: Vec<SectionId> = Vec::new();
        for id in order {
            if !document_order.contains(&id) {
                document_order.push(id);
            }
        }
        Self {
            document_order,
            entries: AHashMap::new(),
            next_seq: 0,
            generation: 0,
        }
    }

    /// Mount (or re-mount) a section.
    ///
    /// Re-registering the same layout object is a no-op. A different layout
    /// replaces the old handle, which is detached.
    pub fn register(&mut self, id: SectionId, layout: Rc<dyn SectionLayout>) {
        if !id.is_well_formed() {
            warn!(target: "folio.registry", section = %id, "refusing malformed section id");
            return;
        }
        if let Some(entry) = self.entries.get_mut(&id) {
            if entry.handle.reads_from(&layout) {
                return;
            }
            entry.handle.detach();
            entry.handle = SectionHandle::new(id.clone(), layout);
            self.generation += 1;
            debug!(target: "folio.registry", section = %id, generation = self.generation, "section handle replaced");
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let handle = SectionHandle::new(id.clone(), layout);
        self.entries.insert(id.clone(), Entry { handle, seq });
        self.generation += 1;
        debug!(target: "folio.registry", section = %id, generation = self.generation, "section registered");
    }

    /// Unmount a section. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &SectionId) {
        if let Some(entry) = self.entries.remove(id) {
            entry.handle.detach();
            self.generation += 1;
            debug!(target: "folio.registry", section = %id, generation = self.generation, "section unregistered");
        }
    }

    #[must_use]
    pub fn lookup(&self, id: &SectionId) -> Option<&SectionHandle> {
        self.entries.get(id).map(|e| &e.handle)
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.entries.contains_key(id)
    }

    /// Handles in document order.
    #[must_use]
    pub fn all(&self) -> Vec<&SectionHandle> {
        let mut declared: Vec<&SectionHandle> = self
            .document_order
            .iter()
            .filter_map(|id| self.lookup(id))
            .collect();
        let mut extra: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|(id, _)| !self.document_order.contains(id))
            .map(|(_, entry)| entry)
            .collect();
        extra.sort_by_key(|entry| entry.seq);
        declared.extend(extra.into_iter().map(|entry| &entry.handle));
        declared
    }

    /// First section in document order, if any is mounted.
    #[must_use]
    pub fn first(&self) -> Option<&SectionHandle> {
        self.all().into_iter().next()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change counter for the handle set.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn document_order(&self) -> &[SectionId] {
        &self.document_order
    }
}
