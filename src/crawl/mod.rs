// src/crawl/mod.rs
// =============================================================================
// This module handles recursive website crawling.
//
// Features:
// - Depth-first crawling from a starting URL, one page at a time
// - The language model decides which links are worth following
// - Configurable depth limit
// - A shared visited set so no page is crawled twice in one run
//
// Rust concepts:
// - Recursion in async code: needs a boxed future (see controller.rs)
// - &mut borrowing: ONE visited set is lent to every recursive call
// =============================================================================

mod controller;

use serde::Serialize;
use std::collections::HashSet;

use crate::fetch::PageSnapshot;

pub use controller::{CrawlController, CrawlSettings, DEFAULT_MAX_DEPTH};

/// URLs already crawled in this traversal.
///
/// Owned by whoever starts the crawl and passed down by `&mut`, never cloned.
pub type VisitedSet = HashSet<String>;

/// A crawled page plus (when aggregation is on) the pages crawled from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawledPage {
    pub url: String,
    pub depth: usize,
    #[serde(flatten)]
    pub snapshot: PageSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CrawledPage>,
}

impl CrawledPage {
    // Counts this page and everything nested under it
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(CrawledPage::page_count).sum::<usize>()
    }
}
