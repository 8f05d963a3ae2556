// src/llm/classifier.rs
// =============================================================================
// This module asks the language model two kinds of questions:
//
// 1. Link triage: "which of these links are worth following?"
//    -> an ordered list of URLs; NEVER an error (bad answers become [])
//
// 2. Page analysis: "summarize this page into these eight keys"
//    -> Ok(Analysis), or Err when nothing usable came back, so the
//       caller can tell "no analysis" apart from "an empty analysis"
//
// The crawl controller only sees the RelevanceClassifier trait, which
// keeps it testable without any network.
// =============================================================================

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::analysis::ANALYSIS_KEYS;
use super::Analysis;
use super::client::LanguageModel;
use super::extract::{extract_json, JsonShape};
use crate::error::CrawlError;
use crate::fetch::PageSnapshot;

/// Decides which links to follow and summarizes pages
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    /// Returns the links worth crawling next, in crawl order.
    /// Any failure is swallowed and reported as an empty list.
    async fn select_relevant_links(&self, candidate_links: &[String], context_url: &str)
        -> Vec<String>;

    async fn summarize(&self, snapshot: &PageSnapshot) -> Result<Analysis, CrawlError>;
}

/// RelevanceClassifier backed by a language model
pub struct LlmClassifier {
    model: Arc<dyn LanguageModel>,
    max_prompt_chars: usize,
}

impl LlmClassifier {
    pub fn new(model: Arc<dyn LanguageModel>, max_prompt_chars: usize) -> Self {
        Self {
            model,
            max_prompt_chars,
        }
    }

    async fn triage(&self, links: &[String], parent_url: &str) -> Result<Vec<String>, CrawlError> {
        let answer = self.model.complete(&link_triage_prompt(links, parent_url)).await?;

        let value = extract_json(&answer, JsonShape::Array).map_err(|e| {
            debug!(response = %answer, "unparseable triage answer");
            CrawlError::ClassifierParse(e.to_string())
        })?;

        // Strings are taken as-is; checking that they are real URLs is
        // the fetcher's job on the next hop
        Ok(value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl RelevanceClassifier for LlmClassifier {
    async fn select_relevant_links(
        &self,
        candidate_links: &[String],
        context_url: &str,
    ) -> Vec<String> {
        if candidate_links.is_empty() {
            return Vec::new();
        }

        match self.triage(candidate_links, context_url).await {
            Ok(links) => links,
            Err(e) => {
                warn!(url = context_url, error = %e, "link triage failed, following no links");
                Vec::new()
            }
        }
    }

    async fn summarize(&self, snapshot: &PageSnapshot) -> Result<Analysis, CrawlError> {
        let prompt = analysis_prompt(snapshot, self.max_prompt_chars);
        let answer = self.model.complete(&prompt).await?;

        let value = extract_json(&answer, JsonShape::Object)
            .map_err(|e| CrawlError::ClassifierParse(e.to_string()))?;

        value
            .as_object()
            .and_then(Analysis::recover)
            .ok_or_else(|| {
                CrawlError::ClassifierParse("no analysis keys in model output".to_string())
            })
    }
}

fn link_triage_prompt(links: &[String], parent_url: &str) -> String {
    let numbered = links
        .iter()
        .enumerate()
        .map(|(index, link)| format!("- {}. {}", index + 1, link))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I have collected the following links from a page ({}):\n\
         {}\n\n\
         Your task is to analyze these links and return ONLY a JSON list of the most relevant URLs for further scraping.\n\
         Do NOT include any additional text or comments. Return ONLY the JSON list, e.g., [\"link1\", \"link2\"].",
        parent_url, numbered
    )
}

fn analysis_prompt(snapshot: &PageSnapshot, max_chars: usize) -> String {
    let keys = ANALYSIS_KEYS
        .iter()
        .map(|key| format!("\"{}\"", key))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following web page content.\n\n\
         Title: {}\n\n\
         Content:\n{}\n\n\
         Return ONLY a JSON object with exactly these keys: {}.\n\
         Each value must be a string or a list of strings. Do NOT include any text outside the JSON object.",
        snapshot.title,
        truncate_chars(&snapshot.body_text, max_chars),
        keys
    )
}

// Cuts text to at most `max` characters without splitting a UTF-8 char
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
