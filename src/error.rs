// src/error.rs
// =============================================================================
// This module defines every way a crawl run can go wrong.
//
// Only one kind of failure is allowed to stop a whole crawl:
// - ResourceAcquisition: we could not even open a fetch session
//
// Everything else is "local" to one page:
// - a page that fails to load just yields nothing for that subtree
// - an LLM call that fails (or answers garbage) is treated as "no links"
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error for our enum
// - #[from]: automatic conversion so the ? operator works on other errors
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for crawl, LLM and persistence operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Could not start a fetch session at all (fatal to the whole run)
    #[error("could not start a fetch session: {0}")]
    ResourceAcquisition(String),

    /// The page did not become ready within the wait bound
    #[error("timed out after {}ms waiting for {url}", .timeout.as_millis())]
    FetchTimeout { url: String, timeout: Duration },

    /// Navigation, HTTP or DOM readiness failure
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The language model service could not be called or refused the call
    #[error("language model call failed: {0}")]
    ClassifierInvocation(String),

    /// The language model answered, but not with usable JSON
    #[error("could not read language model output: {0}")]
    ClassifierParse(String),

    /// GROQ_API_KEY was never configured
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    /// Output file could not be written
    #[error("could not write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output document could not be serialized
    #[error("could not serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A URL given to us could not be parsed
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
}

impl CrawlError {
    /// Only a session that can't be opened unwinds the traversal.
    /// Every other error is logged and swallowed where it happens.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CrawlError::ResourceAcquisition(_))
    }
}
