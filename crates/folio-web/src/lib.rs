#![forbid(unsafe_code)]

//! `folio-web` adapts the section spy to a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes mounts, pointer
//!   crossings, scroll and resize ticks, and navigation clicks.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The host calls [`WebSpy::step`] once per animation frame and applies the
//! returned [`HostCommand`]s (smooth scrolls, focus moves). The presentation
//! models in [`presentation`] turn the published state into what sections and
//! the navigation rail should look like.

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod presentation;

#[cfg(feature = "input-parser")]
pub use input_parser::{InputParseError, parse_host_event, parse_host_events};
pub use presentation::{NavAction, NavEntry, NavEntryStyle, NavRail, SectionVisual};

use core::time::Duration;
use std::collections::VecDeque;
use std::rc::Rc;

use ahash::AHashMap;
use tracing::{trace, warn};

use folio_core::{ActiveState, Bounds, MeasuredLayout, SectionId};
use folio_runtime::reactive::observable::ObservableReader;
use folio_runtime::{SectionSpy, SpyCommand, SpyConfig, Subscription};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Something the page observed.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A section element mounted with its measured bounds.
    Mount { id: SectionId, bounds: Bounds },
    /// A section element unmounted.
    Unmount { id: SectionId },
    /// A mounted section was re-measured.
    Measure { id: SectionId, bounds: Bounds },
    PointerEnter { id: SectionId },
    PointerLeave { id: SectionId },
    Scroll { scroll_y: f64 },
    Resize { height: f64 },
    /// Navigation rail click.
    Navigate { id: SectionId },
}

/// Something the page should do.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// `window.scrollTo({ top, behavior })`.
    ScrollTo { id: SectionId, top: f64, smooth: bool },
    /// Move keyboard focus to the section element.
    Focus(SectionId),
}

/// Result of one [`WebSpy::step`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebOutputs {
    pub state: ActiveState,
    pub changed: bool,
    /// Commands in the order they were produced.
    pub commands: Vec<HostCommand>,
}

/// Host-driven wrapper around [`SectionSpy`].
///
/// Owns the measured layouts of mounted sections so the host only ever sends
/// plain numbers.
#[derive(Debug)]
pub struct WebSpy {
    clock: DeterministicClock,
    spy: SectionSpy,
    queue: VecDeque<HostEvent>,
    layouts: AHashMap<SectionId, MeasuredLayout>,
}

impl Default for WebSpy {
    fn default() -> Self {
        Self::new(SpyConfig::default())
    }
}

impl WebSpy {
    #[must_use]
    pub fn new(config: SpyConfig) -> Self {
        Self {
            clock: DeterministicClock::new(),
            spy: SectionSpy::new(config),
            queue: VecDeque::new(),
            layouts: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    /// The wrapped engine.
    #[must_use]
    pub fn spy(&self) -> &SectionSpy {
        &self.spy
    }

    #[must_use]
    pub fn state(&self) -> ActiveState {
        self.spy.state()
    }

    #[must_use]
    pub fn reader(&self) -> ObservableReader<ActiveState> {
        self.spy.reader()
    }

    pub fn subscribe(&self, callback: impl Fn(&ActiveState) + 'static) -> Subscription {
        self.spy.subscribe(callback)
    }

    /// Queue a host event for the next step.
    pub fn push_event(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Earliest time a step would have timer work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.spy.next_deadline()
    }

    /// Apply every queued event at the clock's current time, then run one
    /// animation frame.
    pub fn step(&mut self) -> WebOutputs {
        let now = self.clock.now();
        let mut commands = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            self.apply(event, now, &mut commands);
        }

        let report = self.spy.frame(now);
        commands.extend(report.commands.into_iter().map(|command| match command {
            SpyCommand::Focus(id) => HostCommand::Focus(id),
        }));
        WebOutputs {
            state: report.state,
            changed: report.changed,
            commands,
        }
    }

    fn apply(&mut self, event: HostEvent, now: Duration, commands: &mut Vec<HostCommand>) {
        trace!(target: "folio.web", ?event, "host event");
        match event {
            HostEvent::Mount { id, bounds } => {
                let layout = MeasuredLayout::new(bounds);
                self.spy.register_section(id.clone(), Rc::new(layout.clone()));
                if self.spy.registry().contains(&id) {
                    self.layouts.insert(id, layout);
                }
            }
            HostEvent::Unmount { id } => {
                self.layouts.remove(&id);
                self.spy.unregister_section(&id);
            }
            HostEvent::Measure { id, bounds } => match self.layouts.get(&id) {
                Some(layout) => {
                    layout.set_bounds(bounds);
                    self.spy.relayout();
                }
                None => warn!(target: "folio.web", section = %id, "measure for unmounted section ignored"),
            },
            HostEvent::PointerEnter { id } => {
                self.spy.pointer_enter(id, now);
            }
            HostEvent::PointerLeave { id } => self.spy.pointer_leave(id, now),
            HostEvent::Scroll { scroll_y } => self.spy.scroll(scroll_y, now),
            HostEvent::Resize { height } => self.spy.resize(height),
            HostEvent::Navigate { id } => {
                if let Some(request) = self.spy.request_scroll_to(&id, now) {
                    commands.push(HostCommand::ScrollTo {
                        id: request.id,
                        top: request.top,
                        smooth: request.smooth,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ActiveSource;

    fn id(s: &str) -> SectionId {
        SectionId::from(s)
    }

    fn mounted() -> WebSpy {
        let mut web = WebSpy::default();
        for (i, name) in ["home", "profile", "experience", "contact"].iter().enumerate() {
            web.push_event(HostEvent::Mount {
                id: id(name),
                bounds: Bounds::new(i as f64 * 800.0, 800.0),
            });
        }
        web.push_event(HostEvent::Resize { height: 1000.0 });
        web.push_event(HostEvent::Scroll { scroll_y: 0.0 });
        web
    }

    #[test]
    fn clock_set_and_advance() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(16));
        clock.set(Duration::from_secs(2));
        clock.advance(Duration::MAX);
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn first_step_mounts_and_resolves() {
        let mut web = mounted();
        assert_eq!(web.pending_events(), 6);
        let out = web.step();
        assert_eq!(web.pending_events(), 0);
        assert!(out.changed);
        assert_eq!(out.state, ActiveState::via(ActiveSource::Intersection, id("home")));
        assert!(out.commands.is_empty());
    }

    #[test]
    fn navigate_emits_scroll_then_focus() {
        let mut web = mounted();
        web.step();
        web.push_event(HostEvent::Navigate { id: id("contact") });
        let out = web.step();
        assert_eq!(
            out.commands,
            vec![HostCommand::ScrollTo {
                id: id("contact"),
                top: 2300.0,
                smooth: true
            }]
        );

        web.clock_mut().advance(Duration::from_millis(300));
        assert_eq!(web.step().commands, vec![HostCommand::Focus(id("contact"))]);
    }

    #[test]
    fn navigate_to_download_entry_does_nothing() {
        let mut web = mounted();
        web.step();
        web.push_event(HostEvent::Navigate { id: id("resume") });
        assert!(web.step().commands.is_empty());
        assert_eq!(web.next_deadline(), None);
    }

    #[test]
    fn measure_updates_live_layout() {
        let mut web = mounted();
        web.step();
        web.push_event(HostEvent::Measure {
            id: id("experience"),
            bounds: Bounds::new(1000.0, 800.0),
        });
        web.push_event(HostEvent::Navigate { id: id("experience") });
        let out = web.step();
        assert_eq!(
            out.commands,
            vec![HostCommand::ScrollTo {
                id: id("experience"),
                top: 900.0,
                smooth: true
            }]
        );
    }

    #[test]
    fn unmount_drops_layout_and_state() {
        let mut web = mounted();
        web.step();
        web.push_event(HostEvent::PointerEnter { id: id("profile") });
        web.push_event(HostEvent::Unmount { id: id("profile") });
        let out = web.step();
        assert!(!out.state.is_active(&id("profile")));
        assert!(!web.spy().registry().contains(&id("profile")));

        // Late measure for the unmounted element is ignored.
        web.push_event(HostEvent::Measure {
            id: id("profile"),
            bounds: Bounds::new(0.0, 10.0),
        });
        web.step();
    }

    #[test]
    fn malformed_mount_is_not_tracked() {
        let mut web = WebSpy::default();
        web.push_event(HostEvent::Mount {
            id: id("about me"),
            bounds: Bounds::new(0.0, 100.0),
        });
        web.step();
        assert!(web.spy().registry().is_empty());
        assert!(web.layouts.is_empty());
    }
}
