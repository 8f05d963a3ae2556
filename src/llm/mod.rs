// src/llm/mod.rs
// =============================================================================
// This module contains everything that talks to the language model.
//
// Submodules:
// - client: sends a prompt to Groq's chat completions API
// - extract: pulls a JSON array/object out of a free-text reply
// - analysis: the fixed-key page analysis and its best-effort recovery
// - classifier: link triage + page summaries built on the three above
// =============================================================================

mod analysis;
mod classifier;
mod client;
mod extract;

pub use analysis::Analysis;
pub use classifier::{LlmClassifier, RelevanceClassifier};
pub use client::{GroqClient, LanguageModel};
