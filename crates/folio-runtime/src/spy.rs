#![forbid(unsafe_code)]

//! The host-driven engine.
//!
//! [`SectionSpy`] owns the registry, the four trackers and the arbiter, and is
//! the inbound surface the page talks to. It never reads the clock: every call
//! that cares about time takes the host's monotonic `now`.
//!
//! # Frame model
//!
//! Pointer events resolve immediately (hover must feel instant). Scroll and
//! resize ticks are only recorded; [`SectionSpy::frame`] is called once per
//! animation frame and does the heavy lifting in a fixed order:
//!
//! 1. Expire timers: close a finished suppression window, resolve hover
//!    graces, fire a pending focus. A hover grace that clears the state
//!    leaves `Idle` for this frame and schedules a resolution for the next.
//! 2. Flush coalesced scroll/resize input.
//! 3. If anything moved (or the registry changed, or this is the first
//!    frame), run an intersection pass, then a scroll resolution.
//! 4. Drop an active id whose section has gone away.

use core::time::Duration;
use std::rc::Rc;

use tracing::{debug, debug_span, warn};

use folio_core::{
    ActiveState, FrameCoalescer, SectionEvent, SectionId, SectionLayout, SectionRegistry,
    Viewport,
};

use crate::arbiter::{ActiveSectionArbiter, ArbiterLogEntry, ArbiterOutcome};
use crate::config::SpyConfig;
use crate::hover::HoverIntentTracker;
use crate::intersection::IntersectionTracker;
use crate::reactive::observable::{ObservableReader, Subscription};
use crate::scroll_position::ScrollPositionTracker;
use crate::suppressor::ProgrammaticScrollSuppressor;
use crate::timer::Deadline;

/// Scroll the host should perform for a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    pub id: SectionId,
    /// Target scroll offset (document px), already corrected for the header.
    pub top: f64,
    pub smooth: bool,
}

/// Deferred host action produced by a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyCommand {
    /// Move keyboard focus to the section.
    Focus(SectionId),
}

/// What one frame did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// State after the frame.
    pub state: ActiveState,
    /// Whether the state changed during the frame.
    pub changed: bool,
    /// Host actions that came due.
    pub commands: Vec<SpyCommand>,
    /// Raw scroll ticks folded into this frame.
    pub scroll_ticks: u32,
}

#[derive(Debug, Clone, Default)]
struct PendingFocus {
    target: Option<SectionId>,
    deadline: Deadline,
}

/// Active-section synchronization engine.
#[derive(Debug)]
pub struct SectionSpy {
    config: SpyConfig,
    registry: SectionRegistry,
    intersection: IntersectionTracker,
    scroll: ScrollPositionTracker,
    hover: HoverIntentTracker,
    suppressor: ProgrammaticScrollSuppressor,
    arbiter: ActiveSectionArbiter,
    coalescer: FrameCoalescer,
    focus: PendingFocus,
    viewport: Viewport,
    /// Force a resolution pass on the next frame.
    needs_resolve: bool,
}

impl Default for SectionSpy {
    fn default() -> Self {
        Self::new(SpyConfig::default())
    }
}

impl SectionSpy {
    /// Engine in the `Idle` state with an empty registry.
    ///
    /// The config is used as given; call [`SpyConfig::validated`] first when it
    /// comes from outside.
    #[must_use]
    pub fn new(config: SpyConfig) -> Self {
        Self {
            registry: SectionRegistry::with_order(config.section_order()),
            intersection: IntersectionTracker::new(config.band),
            scroll: ScrollPositionTracker::new(config.header_offset_px),
            hover: HoverIntentTracker::new(config.hover_grace()),
            suppressor: ProgrammaticScrollSuppressor::new(config.quiet_period()),
            arbiter: ActiveSectionArbiter::new(config.log_capacity),
            coalescer: FrameCoalescer::new(),
            focus: PendingFocus::default(),
            viewport: Viewport::default(),
            needs_resolve: true,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SpyConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current active state.
    #[must_use]
    pub fn state(&self) -> ActiveState {
        self.arbiter.state()
    }

    /// Read-only handle for sections and the navigation rail.
    #[must_use]
    pub fn reader(&self) -> ObservableReader<ActiveState> {
        self.arbiter.reader()
    }

    /// Push every future transition to `callback`.
    pub fn subscribe(&self, callback: impl Fn(&ActiveState) + 'static) -> Subscription {
        self.arbiter.subscribe(callback)
    }

    /// Recent arbiter dispatches, oldest first.
    pub fn dispatch_log(&self) -> impl Iterator<Item = &ArbiterLogEntry> {
        self.arbiter.log()
    }

    /// Section under the pointer, ignoring hover grace.
    #[must_use]
    pub fn pointer_inside(&self) -> Option<&SectionId> {
        self.hover.pointer_inside()
    }

    #[must_use]
    pub fn is_suppressed(&self, now: Duration) -> bool {
        self.suppressor.is_suppressed(now)
    }

    /// Earliest pending timer, so hosts can sleep until the next frame worth
    /// running.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.suppressor.window().map(|w| w.expires_at),
            self.hover.next_deadline(),
            self.focus.deadline.fire_at(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // --- inbound: section lifecycle -------------------------------------

    /// Mount a section.
    pub fn register_section(&mut self, id: impl Into<SectionId>, layout: Rc<dyn SectionLayout>) {
        self.registry.register(id.into(), layout);
        self.needs_resolve = true;
    }

    /// Unmount a section: cancel its timers, forget it everywhere, and clear
    /// it from the active state, all before returning.
    pub fn unregister_section(&mut self, id: &SectionId) {
        self.hover.cancel(id);
        if self.focus.target.as_ref() == Some(id) {
            self.focus.deadline.cancel();
            self.focus.target = None;
        }
        self.intersection.forget(id);
        self.registry.unregister(id);
        self.arbiter.revalidate(&self.registry);
        self.needs_resolve = true;
    }

    /// Section geometry changed under live handles (reflow, font load).
    /// The next frame re-resolves.
    pub fn relayout(&mut self) {
        self.needs_resolve = true;
    }

    // --- inbound: pointer -------------------------------------------------

    pub fn pointer_enter(&mut self, id: impl Into<SectionId>, now: Duration) -> ArbiterOutcome {
        // Graces that ran out before this enter still report their clear.
        if self.expire_hover(now) {
            self.needs_resolve = true;
        }
        let event = self.hover.pointer_enter(id.into());
        self.dispatch(event, now)
    }

    pub fn pointer_leave(&mut self, id: impl Into<SectionId>, now: Duration) {
        self.hover.pointer_leave(id.into(), now);
    }

    // --- inbound: motion --------------------------------------------------

    /// Record a scroll tick. Resolution waits for the next frame.
    pub fn scroll(&mut self, scroll_y: f64, now: Duration) {
        self.coalescer.push_scroll(scroll_y);
        self.suppressor.note_scroll(now);
    }

    /// Record a viewport resize. Resolution waits for the next frame.
    pub fn resize(&mut self, height: f64) {
        self.coalescer.push_resize(height);
    }

    /// Set the full viewport at once (initial paint).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.coalescer.push_scroll(viewport.scroll_y);
        self.coalescer.push_resize(viewport.height);
    }

    // --- inbound: navigation ----------------------------------------------

    /// Navigation rail click.
    ///
    /// Opens a suppression window, schedules focus for the target, and
    /// returns the scroll the host should perform. Unknown sections produce no
    /// scroll and no suppression.
    pub fn request_scroll_to(&mut self, id: &SectionId, now: Duration) -> Option<ScrollRequest> {
        let Some(top) = self.registry.lookup(id).and_then(|h| h.top_offset()) else {
            warn!(target: "folio.spy", section = %id, "navigation to unregistered section ignored");
            return None;
        };
        self.suppressor.begin(now);
        self.focus.target = Some(id.clone());
        self.focus.deadline.arm(now + self.config.focus_delay());
        let request = ScrollRequest {
            id: id.clone(),
            top: (top - self.config.nav_scroll_offset_px).max(0.0),
            smooth: true,
        };
        debug!(target: "folio.spy", section = %id, top = request.top, "navigation scroll requested");
        Some(request)
    }

    // --- frame --------------------------------------------------------------

    /// Run one animation frame at `now`.
    pub fn frame(&mut self, now: Duration) -> FrameReport {
        let _span = debug_span!("folio.frame", now_ms = now.as_millis() as u64).entered();
        let version_before = self.arbiter.version();
        let mut commands = Vec::new();

        if self.suppressor.poll(now) {
            // Re-check where the page landed once the motion settled.
            self.needs_resolve = true;
        }
        let hover_cleared = self.expire_hover(now);
        if self.focus.deadline.fire_if_due(now) {
            if let Some(target) = self.focus.target.take() {
                if self.registry.contains(&target) {
                    commands.push(SpyCommand::Focus(target));
                }
            }
        }

        let input = self.coalescer.flush();
        if let Some(input) = input {
            if let Some(scroll_y) = input.scroll_y {
                self.viewport.scroll_y = scroll_y;
            }
            if let Some(height) = input.viewport_height {
                self.viewport.height = height;
            }
        }
        let scrolled = input.is_some_and(|i| i.scroll_y.is_some());
        let resized = input.is_some_and(|i| i.viewport_height.is_some());

        let resubscribe = self.intersection.needs_resubscribe(&self.registry);
        if scrolled || resized || resubscribe || self.needs_resolve {
            for event in self.intersection.observe(&self.registry, self.viewport) {
                self.dispatch(event, now);
            }
        }
        if scrolled || self.needs_resolve {
            if let Some(event) = self.scroll.resolve(&self.registry, self.viewport.scroll_y) {
                self.dispatch(event, now);
            }
        }
        // A hover that just cleared hands back to the section under the
        // header on the next frame.
        self.needs_resolve = hover_cleared;

        self.arbiter.revalidate(&self.registry);

        FrameReport {
            state: self.arbiter.state(),
            changed: self.arbiter.version() != version_before,
            commands,
            scroll_ticks: input.map_or(0, |i| i.scroll_ticks),
        }
    }

    /// Forget everything transient, as on page reload. Sections stay mounted.
    pub fn reset(&mut self) {
        self.hover = HoverIntentTracker::new(self.config.hover_grace());
        self.suppressor.cancel();
        self.focus = PendingFocus::default();
        self.coalescer.clear();
        self.intersection.disconnect();
        self.arbiter.reset();
        self.needs_resolve = true;
    }

    /// Dispatch every expired hover grace. Returns whether one of them
    /// cleared the active state.
    fn expire_hover(&mut self, now: Duration) -> bool {
        let mut cleared = false;
        for event in self.hover.poll(now) {
            cleared |= self.dispatch(event, now).is_transition();
        }
        cleared
    }

    fn dispatch(&mut self, event: SectionEvent, now: Duration) -> ArbiterOutcome {
        let suppressed = self.suppressor.is_suppressed(now);
        self.arbiter.dispatch(event, &self.registry, suppressed)
    }
}
