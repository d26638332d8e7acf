#![forbid(unsafe_code)]

//! Log-level policy for the section spy.
//!
//! Ignored events that point at a host bug (unknown or malformed section ids,
//! navigation to an unmounted section) are WARN; transitions are DEBUG and
//! carry the new source; propagation runs inside an `active.propagate` span.
//!
//! Run:
//!   cargo test -p folio-runtime --test tracing_ignored_events

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use folio_core::{Bounds, MeasuredLayout, SectionId, Viewport};
use folio_runtime::SectionSpy;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
        });
    }
}

type Captured = (Arc<Mutex<Vec<CapturedEvent>>>, Arc<Mutex<Vec<String>>>);

fn with_capture(run: impl FnOnce()) -> Captured {
    let events = Arc::new(Mutex::new(Vec::new()));
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
        spans: Arc::clone(&spans),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, run);
    (events, spans)
}

fn mounted() -> SectionSpy {
    let mut spy = SectionSpy::default();
    for (i, name) in ["home", "profile", "experience", "contact"].iter().enumerate() {
        spy.register_section(
            *name,
            Rc::new(MeasuredLayout::new(Bounds::new(i as f64 * 800.0, 800.0))),
        );
    }
    spy.set_viewport(Viewport::new(0.0, 1000.0));
    spy
}

#[test]
fn unknown_section_hover_is_warned() {
    let (events, _) = with_capture(|| {
        let mut spy = mounted();
        spy.pointer_enter("resume", std::time::Duration::ZERO);
        assert!(spy.state().is_idle());
    });
    let events = events.lock().unwrap();
    let warn = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN && e.target == "folio.arbiter")
        .expect("warn for unknown section");
    assert!(warn.message.contains("unregistered section"), "{warn:?}");
    assert_eq!(warn.fields.get("section").map(String::as_str), Some("resume"));
    assert_eq!(warn.fields.get("event").map(String::as_str), Some("hover_start"));
}

#[test]
fn malformed_section_registration_is_warned() {
    let (events, _) = with_capture(|| {
        let mut spy = SectionSpy::default();
        spy.register_section(
            "not valid",
            Rc::new(MeasuredLayout::new(Bounds::new(0.0, 100.0))),
        );
        assert!(spy.registry().is_empty());
    });
    let events = events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.target == "folio.registry"),
        "{events:?}"
    );
}

#[test]
fn navigation_to_unmounted_section_is_warned() {
    let (events, _) = with_capture(|| {
        let mut spy = mounted();
        assert!(
            spy.request_scroll_to(&SectionId::from("resume"), std::time::Duration::ZERO)
                .is_none()
        );
    });
    let events = events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.target == "folio.spy"),
        "{events:?}"
    );
}

#[test]
fn transitions_are_debug_with_source() {
    let (events, spans) = with_capture(|| {
        let mut spy = mounted();
        let _sub = spy.subscribe(|_| {});
        spy.frame(std::time::Duration::ZERO);
        spy.pointer_enter("contact", std::time::Duration::from_millis(5));
    });
    let events = events.lock().unwrap();
    let transitions: Vec<_> = events
        .iter()
        .filter(|e| e.target == "folio.arbiter" && e.message == "active section changed")
        .collect();
    assert_eq!(transitions.len(), 2, "{transitions:?}");
    assert!(transitions.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert_eq!(
        transitions[0].fields.get("source").map(String::as_str),
        Some("intersection")
    );
    assert_eq!(
        transitions[1].fields.get("source").map(String::as_str),
        Some("hover")
    );
    assert!(
        !events.iter().any(|e| e.level == tracing::Level::WARN),
        "no warnings on the happy path: {events:?}"
    );

    let spans = spans.lock().unwrap();
    assert!(spans.iter().any(|name| name == "folio.frame"));
    assert_eq!(
        spans.iter().filter(|name| *name == "active.propagate").count(),
        2
    );
}
