#![forbid(unsafe_code)]

//! JSON input parser for host events.
//!
//! The page's glue script serializes DOM observations as small JSON objects
//! and [`parse_host_event`] turns each one into a [`HostEvent`]:
//!
//! ```json
//! {"kind":"mount","section":"profile","top":800,"height":800}
//! {"kind":"measure","section":"profile","top":760,"height":820}
//! {"kind":"unmount","section":"profile"}
//! {"kind":"pointer","phase":"enter","section":"profile"}
//! {"kind":"scroll","y":1240.5}
//! {"kind":"resize","height":900}
//! {"kind":"navigate","section":"experience"}
//! ```
//!
//! Kinds the engine has no use for (`"key"`, `"focus"`, ...) yield `Ok(None)`.

use serde::Deserialize;

use folio_core::{Bounds, SectionId};

use crate::HostEvent;

/// Errors from parsing host event JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Unknown pointer phase value.
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}

/// Internal deserialization target.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    top: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

/// Parse one JSON-encoded host event.
///
/// Returns `Ok(None)` for kinds with no [`HostEvent`] equivalent, and `Err`
/// for malformed JSON or missing fields.
pub fn parse_host_event(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "mount" => HostEvent::Mount {
            id: section(&raw)?,
            bounds: bounds(&raw)?,
        },
        "measure" => HostEvent::Measure {
            id: section(&raw)?,
            bounds: bounds(&raw)?,
        },
        "unmount" => HostEvent::Unmount { id: section(&raw)? },
        "pointer" => parse_pointer(&raw)?,
        "scroll" => HostEvent::Scroll {
            scroll_y: number(raw.y, "y")?,
        },
        "resize" => HostEvent::Resize {
            height: number(raw.height, "height")?,
        },
        "navigate" => HostEvent::Navigate { id: section(&raw)? },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// Parse a JSON array of host events, skipping kinds with no mapping.
pub fn parse_host_events(json: &str) -> Result<Vec<HostEvent>, InputParseError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    let mut events = Vec::with_capacity(items.len());
    for item in items {
        if let Some(event) = parse_host_event(&item.to_string())? {
            events.push(event);
        }
    }
    Ok(events)
}

fn parse_pointer(raw: &RawInput) -> Result<HostEvent, InputParseError> {
    let id = section(raw)?;
    match raw.phase.as_deref() {
        Some("enter") => Ok(HostEvent::PointerEnter { id }),
        Some("leave") => Ok(HostEvent::PointerLeave { id }),
        Some(other) => Err(InputParseError::UnknownPhase(other.to_string())),
        None => Err(InputParseError::MissingField("phase")),
    }
}

fn section(raw: &RawInput) -> Result<SectionId, InputParseError> {
    raw.section
        .as_deref()
        .map(SectionId::from)
        .ok_or(InputParseError::MissingField("section"))
}

fn bounds(raw: &RawInput) -> Result<Bounds, InputParseError> {
    Ok(Bounds::new(
        number(raw.top, "top")?,
        number(raw.height, "height")?,
    ))
}

fn number(value: Option<f64>, field: &'static str) -> Result<f64, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_phases() {
        assert_eq!(
            parse_host_event(r#"{"kind":"pointer","phase":"enter","section":"profile"}"#),
            Ok(Some(HostEvent::PointerEnter {
                id: SectionId::from("profile")
            }))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"pointer","phase":"leave","section":"profile"}"#),
            Ok(Some(HostEvent::PointerLeave {
                id: SectionId::from("profile")
            }))
        );
    }

    #[test]
    fn mount_carries_bounds() {
        assert_eq!(
            parse_host_event(r#"{"kind":"mount","section":"home","top":0,"height":812.5}"#),
            Ok(Some(HostEvent::Mount {
                id: SectionId::from("home"),
                bounds: Bounds::new(0.0, 812.5),
            }))
        );
    }

    #[test]
    fn unmapped_kinds_are_skipped() {
        assert_eq!(parse_host_event(r#"{"kind":"key","key":"a"}"#), Ok(None));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_host_event("{not json"),
            Err(InputParseError::Json(_))
        ));
        assert_eq!(
            parse_host_event(r#"{"kind":"pointer","phase":"hover","section":"home"}"#),
            Err(InputParseError::UnknownPhase("hover".into()))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"pointer","section":"home"}"#),
            Err(InputParseError::MissingField("phase"))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"navigate"}"#),
            Err(InputParseError::MissingField("section"))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"scroll"}"#),
            Err(InputParseError::MissingField("y"))
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("section").to_string(),
            "missing required field: section"
        );
    }

    #[test]
    fn batch_parse_skips_unmapped() {
        let events = parse_host_events(
            r#"[{"kind":"scroll","y":10},{"kind":"focus"},{"kind":"resize","height":700}]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                HostEvent::Scroll { scroll_y: 10.0 },
                HostEvent::Resize { height: 700.0 }
            ]
        );
    }
}
