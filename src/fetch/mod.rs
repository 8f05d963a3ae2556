// src/fetch/mod.rs
// =============================================================================
// This module loads one page and hands back what was on it.
//
// The crawl controller only ever talks to two small traits:
// - PageFetcher: opens a fresh, scoped session (one per page)
// - FetchSession: loads a URL and returns a PageSnapshot
//
// A session owns whatever the fetch needs (an HTTP client here). It is
// released when it is dropped, so every exit path (success, error, early
// return) gives the resources back without any extra code.
//
// Submodules:
// - html: turns raw HTML into a PageSnapshot
// - http: the reqwest-backed implementation of both traits
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CrawlError;

pub use html::{canonical_url, extract_snapshot};
pub use http::HttpPageFetcher;

/// What one successful page load captured.
///
/// Serialized as `{"title", "body", "links"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub title: String,
    #[serde(rename = "body")]
    pub body_text: String,
    /// Absolute http(s) URLs, in document order
    pub links: Vec<String>,
}

/// Opens scoped fetch sessions.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fails only when no session can be started at all, which is
    /// the one error that stops a whole crawl.
    async fn open_session(&self) -> Result<Box<dyn FetchSession>, CrawlError>;
}

/// One page load. Dropping the session releases its resources.
#[async_trait]
pub trait FetchSession: Send {
    async fn fetch(&mut self, url: &str, timeout: Duration) -> Result<PageSnapshot, CrawlError>;
}
