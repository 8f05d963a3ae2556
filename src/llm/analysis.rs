// src/llm/analysis.rs
// =============================================================================
// This module defines the structured page analysis and how we recover it
// from whatever the model sent back.
//
// The analysis ALWAYS has the same eight keys, in the same order:
//   overview, main_themes, key_information, audience_target,
//   content_quality, similar_websites, improvement_possibilities,
//   accessibility_issues
//
// Each value is either a string or a list of strings. Recovery is
// best-effort:
// - a key with a string or list-of-strings value is kept
// - a missing key, or one with any other type, becomes an empty list
// - if NOT ONE key could be recovered, there is no analysis at all
// =============================================================================

use serde::Serialize;
use serde_json::{Map, Value};

/// The fixed key set, in output order
pub const ANALYSIS_KEYS: [&str; 8] = [
    "overview",
    "main_themes",
    "key_information",
    "audience_target",
    "content_quality",
    "similar_websites",
    "improvement_possibilities",
    "accessibility_issues",
];

/// One analysis value: plain text or a list of items
///
/// #[serde(untagged)] writes the inner value directly ("..." or [...])
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisField {
    Text(String),
    List(Vec<String>),
}

impl Default for AnalysisField {
    fn default() -> Self {
        AnalysisField::List(Vec::new())
    }
}

impl AnalysisField {
    // Accepts a string, or an array whose items are ALL strings
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(AnalysisField::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(AnalysisField::List),
            _ => None,
        }
    }
}

/// Structured summary of one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub overview: AnalysisField,
    pub main_themes: AnalysisField,
    pub key_information: AnalysisField,
    pub audience_target: AnalysisField,
    pub content_quality: AnalysisField,
    pub similar_websites: AnalysisField,
    pub improvement_possibilities: AnalysisField,
    pub accessibility_issues: AnalysisField,
}

impl Analysis {
    // Builds an analysis from a parsed JSON object
    //
    // Returns: Some(analysis) if at least one key was usable, None otherwise
    pub fn recover(object: &Map<String, Value>) -> Option<Self> {
        let mut recovered = 0;
        let mut field = |key: &str| match object.get(key).and_then(AnalysisField::from_value) {
            Some(value) => {
                recovered += 1;
                value
            }
            None => AnalysisField::default(),
        };

        let analysis = Analysis {
            overview: field("overview"),
            main_themes: field("main_themes"),
            key_information: field("key_information"),
            audience_target: field("audience_target"),
            content_quality: field("content_quality"),
            similar_websites: field("similar_websites"),
            improvement_possibilities: field("improvement_possibilities"),
            accessibility_issues: field("accessibility_issues"),
        };

        if recovered == 0 {
            None
        } else {
            Some(analysis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_recovers_strings_and_lists() {
        let analysis = Analysis::recover(&object(json!({
            "overview": "A game site",
            "main_themes": ["games", "community"],
            "extra_key": "ignored"
        })))
        .unwrap();

        assert_eq!(analysis.overview, AnalysisField::Text("A game site".into()));
        assert_eq!(
            analysis.main_themes,
            AnalysisField::List(vec!["games".into(), "community".into()])
        );
        assert_eq!(analysis.accessibility_issues, AnalysisField::List(vec![]));
    }

    #[test]
    fn test_wrong_types_become_empty() {
        let analysis = Analysis::recover(&object(json!({
            "overview": "ok",
            "main_themes": 42,
            "key_information": ["fine", 3]
        })))
        .unwrap();

        assert_eq!(analysis.main_themes, AnalysisField::default());
        assert_eq!(analysis.key_information, AnalysisField::default());
    }

    #[test]
    fn test_nothing_recoverable_is_none() {
        assert!(Analysis::recover(&object(json!({"summary": "wrong keys"}))).is_none());
    }

    #[test]
    fn test_serializes_every_key_in_order() {
        let json = serde_json::to_string(&Analysis::default()).unwrap();
        let mut last = 0;
        for key in ANALYSIS_KEYS {
            let pos = json.find(&format!("\"{}\"", key)).unwrap();
            assert!(pos >= last, "{} out of order", key);
            last = pos;
        }
    }
}
