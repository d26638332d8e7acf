#![forbid(unsafe_code)]

//! Host mistakes (stale measures, clicks on unmounted sections) are logged at
//! WARN and never change state.
//!
//! Run:
//!   cargo test -p folio-web --test host_warnings

use std::sync::{Arc, Mutex};

use folio_core::{Bounds, SectionId};
use folio_web::{HostEvent, WebSpy};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct Warning {
    target: String,
    section: Option<String>,
}

struct WarnCapture(Arc<Mutex<Vec<Warning>>>);

struct SectionField(Option<String>);

impl tracing::field::Visit for SectionField {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "section" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }
        let mut visitor = SectionField(None);
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Warning {
            target: event.metadata().target().to_string(),
            section: visitor.0,
        });
    }
}

fn id(s: &str) -> SectionId {
    SectionId::from(s)
}

#[test]
fn stale_host_events_warn() {
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(WarnCapture(Arc::clone(&warnings)));

    tracing::subscriber::with_default(subscriber, || {
        let mut web = WebSpy::default();
        web.push_event(HostEvent::Mount {
            id: id("home"),
            bounds: Bounds::new(0.0, 800.0),
        });
        web.push_event(HostEvent::Resize { height: 1000.0 });
        web.push_event(HostEvent::Scroll { scroll_y: 0.0 });
        let before = web.step().state;

        web.push_event(HostEvent::Measure {
            id: id("profile"),
            bounds: Bounds::new(800.0, 800.0),
        });
        web.push_event(HostEvent::Navigate { id: id("profile") });
        let out = web.step();
        assert_eq!(out.state, before);
        assert!(out.commands.is_empty());
    });

    let warnings = warnings.lock().unwrap();
    let targets: Vec<&str> = warnings.iter().map(|w| w.target.as_str()).collect();
    assert_eq!(targets, vec!["folio.web", "folio.spy"], "{warnings:?}");
    assert!(
        warnings
            .iter()
            .all(|w| w.section.as_deref() == Some("profile"))
    );
}
