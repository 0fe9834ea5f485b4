#![forbid(unsafe_code)]

//! JSON input parser for converting page-script encoded inputs to
//! [`DeckInput`] values.
//!
//! The page script forwards DOM events as small JSON objects tagged by
//! `kind`:
//!
//! | kind           | fields                                   |
//! |----------------|------------------------------------------|
//! | `scroll`       | `y`                                      |
//! | `resize`       | `viewport_height`, `document_height`     |
//! | `layout`       | `sections: [{ top, height }, ...]`       |
//! | `key`          | `key` (DOM `KeyboardEvent.key`)          |
//! | `click`        | `target` (`"dot"` or `"nav"`), `index`   |
//! | `intersection` | `index`, `ratio`                         |
//!
//! Kinds without a deck mapping and keys that do not navigate return
//! `Ok(None)`, so the page can forward events without filtering them first.

use flipdeck_core::{DeckInput, NavKey, SectionBounds};
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Unknown click target.
    #[error("unknown click target: {0}")]
    UnknownTarget(String),
}

#[derive(Debug, Deserialize)]
struct RawSection {
    top: f64,
    height: f64,
}

/// Internal deserialization target matching the page script's JSON schema.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    viewport_height: Option<f64>,
    #[serde(default)]
    document_height: Option<f64>,
    #[serde(default)]
    sections: Option<Vec<RawSection>>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    ratio: Option<f64>,
}

/// Parse a JSON-encoded page input into a [`DeckInput`].
///
/// # Errors
///
/// Returns `Err` for malformed JSON, missing required fields or an unknown
/// click target.
pub fn parse_encoded_input(json: &str) -> Result<Option<DeckInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "scroll" => Ok(Some(DeckInput::Scroll {
            y: required(raw.y, "y")?,
        })),
        "resize" => Ok(Some(DeckInput::Resize {
            viewport_height: required(raw.viewport_height, "viewport_height")?,
            document_height: required(raw.document_height, "document_height")?,
        })),
        "layout" => {
            let sections = required(raw.sections, "sections")?
                .into_iter()
                .map(|s| SectionBounds::new(s.top, s.height))
                .collect();
            Ok(Some(DeckInput::Layout(sections)))
        }
        "key" => {
            let key = required(raw.key, "key")?;
            Ok(NavKey::from_dom_key(&key).map(DeckInput::Key))
        }
        "click" => parse_click(raw.target, raw.index).map(Some),
        "intersection" => Ok(Some(DeckInput::Intersection {
            index: required(raw.index, "index")?,
            ratio: required(raw.ratio, "ratio")?,
        })),
        _ => Ok(None),
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

fn parse_click(target: Option<String>, index: Option<usize>) -> Result<DeckInput, InputParseError> {
    let target = required(target, "target")?;
    let index = required(index, "index")?;
    match target.as_str() {
        "dot" => Ok(DeckInput::DotClick(index)),
        "nav" | "goto" => Ok(DeckInput::NavLinkClick(index)),
        _ => Err(InputParseError::UnknownTarget(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Option<DeckInput> {
        parse_encoded_input(json).unwrap()
    }

    #[test]
    fn scroll_and_resize() {
        assert_eq!(
            parse(r#"{"kind":"scroll","y":1234.5}"#),
            Some(DeckInput::Scroll { y: 1234.5 })
        );
        assert_eq!(
            parse(r#"{"kind":"resize","viewport_height":800,"document_height":3200}"#),
            Some(DeckInput::Resize {
                viewport_height: 800.0,
                document_height: 3200.0,
            })
        );
    }

    #[test]
    fn layout_sections() {
        assert_eq!(
            parse(r#"{"kind":"layout","sections":[{"top":0,"height":900},{"top":900,"height":700}]}"#),
            Some(DeckInput::Layout(vec![
                SectionBounds::new(0.0, 900.0),
                SectionBounds::new(900.0, 700.0),
            ]))
        );
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            parse(r#"{"kind":"key","key":"PageDown"}"#),
            Some(DeckInput::Key(NavKey::Next))
        );
        assert_eq!(
            parse(r#"{"kind":"key","key":"ArrowLeft"}"#),
            Some(DeckInput::Key(NavKey::Previous))
        );
        assert_eq!(parse(r#"{"kind":"key","key":"a"}"#), None);
    }

    #[test]
    fn clicks_by_target() {
        assert_eq!(
            parse(r#"{"kind":"click","target":"dot","index":2}"#),
            Some(DeckInput::DotClick(2))
        );
        assert_eq!(
            parse(r#"{"kind":"click","target":"nav","index":1}"#),
            Some(DeckInput::NavLinkClick(1))
        );
        assert_eq!(
            parse(r#"{"kind":"click","target":"goto","index":3}"#),
            Some(DeckInput::NavLinkClick(3))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"click","target":"logo","index":0}"#),
            Err(InputParseError::UnknownTarget("logo".into()))
        );
    }

    #[test]
    fn intersection_report() {
        assert_eq!(
            parse(r#"{"kind":"intersection","index":3,"ratio":0.72}"#),
            Some(DeckInput::Intersection {
                index: 3,
                ratio: 0.72,
            })
        );
    }

    #[test]
    fn unknown_kind_is_ignored() {
        assert_eq!(parse(r#"{"kind":"touch","x":1}"#), None);
    }

    #[test]
    fn malformed_and_missing_fields() {
        assert!(matches!(
            parse_encoded_input("{not json"),
            Err(InputParseError::Json(_))
        ));
        assert_eq!(
            parse_encoded_input(r#"{"kind":"scroll"}"#),
            Err(InputParseError::MissingField("y"))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"click","target":"dot"}"#),
            Err(InputParseError::MissingField("index"))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"click","target":"dot","index":-1}"#)
                .map_err(|e| matches!(e, InputParseError::Json(_))),
            Err(true)
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("ratio").to_string(),
            "missing required field: ratio"
        );
        assert_eq!(
            InputParseError::UnknownTarget("x".into()).to_string(),
            "unknown click target: x"
        );
    }
}
