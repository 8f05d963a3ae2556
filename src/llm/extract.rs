// src/llm/extract.rs
// =============================================================================
// This module digs a JSON value out of free-text model output.
//
// Models love to wrap their answer in prose:
//   "Sure! Here are the links: ["https://a.com"] Hope that helps."
//
// The rule we apply:
// 1. Find the FIRST opening delimiter ('[' for arrays, '{' for objects)
// 2. Find the LAST closing delimiter (']' or '}')
// 3. Parse everything between them (inclusive) as JSON
// 4. Anything outside that span is ignored
//
// The result keeps "there was no JSON" apart from "the JSON was empty":
// Ok(json!([])) is a valid empty answer, Err(..) means nothing usable.
// =============================================================================

use serde_json::Value;
use thiserror::Error;

/// The kind of JSON value we expect to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no {0:?} span found in model output")]
    NoJsonSpan(JsonShape),

    #[error("model output span is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

// Extracts the first-open .. last-close JSON span of the given shape
//
// Parameters:
//   raw: the model's full reply
//   shape: whether we want an array or an object
//
// Returns: the parsed value, which is always of the requested shape
pub fn extract_json(raw: &str, shape: JsonShape) -> Result<Value, ExtractError> {
    let (open, close) = shape.delimiters();

    let start = raw.find(open).ok_or(ExtractError::NoJsonSpan(shape))?;
    let end = raw.rfind(close).ok_or(ExtractError::NoJsonSpan(shape))?;
    if end < start {
        return Err(ExtractError::NoJsonSpan(shape));
    }

    // Both delimiters are one byte wide, so these are valid char boundaries
    Ok(serde_json::from_str(&raw[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_wrapped_in_prose() {
        let raw = r#"Here you go: ["https://a.com", "https://b.com"] - enjoy!"#;
        let value = extract_json(raw, JsonShape::Array).unwrap();
        assert_eq!(value, json!(["https://a.com", "https://b.com"]));
    }

    #[test]
    fn test_empty_array_is_success() {
        let value = extract_json("[]", JsonShape::Array).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_no_brackets_is_no_span() {
        let err = extract_json("here are the links: link1, link2", JsonShape::Array).unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonSpan(JsonShape::Array)));
    }

    #[test]
    fn test_reversed_brackets_is_no_span() {
        let err = extract_json("] nothing [", JsonShape::Array).unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonSpan(_)));
    }

    #[test]
    fn test_unquoted_items_are_malformed() {
        let err = extract_json("[link1, link2]", JsonShape::Array).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }

    #[test]
    fn test_object_inside_markdown_fence() {
        let raw = "```json\n{\"overview\": \"A site\", \"main_themes\": [\"games\"]}\n```";
        let value = extract_json(raw, JsonShape::Object).unwrap();
        assert_eq!(value["overview"], "A site");
        assert_eq!(value["main_themes"], json!(["games"]));
    }

    #[test]
    fn test_two_arrays_span_is_malformed() {
        // First '[' to last ']' covers both arrays plus the text between them
        let err = extract_json(r#"["a"] and ["b"]"#, JsonShape::Array).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }
}
