// src/crawl/controller.rs
// =============================================================================
// This module implements depth-bounded recursive crawling with
// LLM-assisted link triage.
//
// How it works, for ONE page:
// 1. Open a fetch session, load the page, release the session
// 2. Remember the URL in the visited set (even if loading failed)
// 3. If loading failed: log it and return None (this subtree is gone,
//    but the rest of the crawl carries on)
// 4. If we're at max depth: return the page, no triage, no recursion
// 5. Ask the classifier which links are worth following
// 6. Crawl each of those links (depth + 1) one after another, skipping
//    anything already visited
// 7. Return this page's snapshot (children are only kept when
//    aggregation is turned on)
//
// Only a failure to OPEN a session stops the whole crawl.
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CrawledPage, VisitedSet};
use crate::error::CrawlError;
use crate::fetch::{PageFetcher, PageSnapshot};
use crate::llm::RelevanceClassifier;

pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Knobs for one traversal
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Pages at this depth are fetched but never triaged
    pub max_depth: usize,
    /// Per-page wait bound handed to the fetcher
    pub fetch_timeout: Duration,
    /// Keep child pages in the returned tree instead of dropping them
    pub aggregate: bool,
}

/// Drives the fetch -> triage -> recurse loop
pub struct CrawlController {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn RelevanceClassifier>,
    settings: CrawlSettings,
}

impl CrawlController {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn RelevanceClassifier>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            settings,
        }
    }

    // Crawls from a root URL with a fresh visited set
    //
    // Returns:
    //   Ok(Some(page)) = root loaded (children inside only if aggregating)
    //   Ok(None)       = root could not be loaded
    //   Err            = no fetch session could be opened
    pub async fn crawl_from(&self, root_url: &str) -> Result<Option<CrawledPage>, CrawlError> {
        let mut visited = VisitedSet::new();
        let result = self.crawl(root_url, &mut visited, 0).await;
        info!(visited = visited.len(), "crawl finished");
        result
    }

    // Crawls one page and (depth permitting) the relevant pages it links to
    //
    // Parameters:
    //   url: absolute URL of this page
    //   visited: the traversal's ONE shared visited set
    //   depth: how many hops we are from the root (root = 0)
    //
    // An async fn can't call itself directly (its future would contain
    // itself and have infinite size), so we return a boxed future instead.
    pub fn crawl<'a>(
        &'a self,
        url: &'a str,
        visited: &'a mut VisitedSet,
        depth: usize,
    ) -> BoxFuture<'a, Result<Option<CrawledPage>, CrawlError>> {
        async move {
            let fetched = self.fetch_page(url).await;
            visited.insert(url.to_string());

            let snapshot = match fetched {
                Ok(snapshot) => snapshot,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(url, depth, error = %e, "page unavailable, skipping subtree");
                    return Ok(None);
                }
            };
            info!(url, depth, links = snapshot.links.len(), "scraped");

            if depth >= self.settings.max_depth {
                return Ok(Some(CrawledPage {
                    url: url.to_string(),
                    depth,
                    snapshot,
                    children: Vec::new(),
                }));
            }

            let relevant = self
                .classifier
                .select_relevant_links(&snapshot.links, url)
                .await;
            info!(url, depth, ?relevant, "relevant links");

            let mut children = Vec::new();
            for link in &relevant {
                if visited.contains(link) {
                    debug!(url = %link, "already visited");
                    continue;
                }

                // Sequential on purpose: this child's whole subtree finishes
                // before the next sibling starts
                if let Some(child) = self.crawl(link, visited, depth + 1).await? {
                    if self.settings.aggregate {
                        children.push(child);
                    }
                }
            }

            Ok(Some(CrawledPage {
                url: url.to_string(),
                depth,
                snapshot,
                children,
            }))
        }
        .boxed()
    }

    // Opens a session, loads one page, and drops the session before returning
    async fn fetch_page(&self, url: &str) -> Result<PageSnapshot, CrawlError> {
        let mut session = self.fetcher.open_session().await?;
        session.fetch(url, self.settings.fetch_timeout).await
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is visited a &mut VisitedSet and not a VisitedSet?
//    - Passing the set by value would give every call its own copy
//    - Siblings would then never see what the others visited
//    - &mut lends the SAME set to each call, one call at a time
//
// 2. What is BoxFuture?
//    - Pin<Box<dyn Future<Output = T> + Send + 'a>>
//    - Boxing puts the future on the heap, so its size is known
//    - .boxed() (from FutureExt) does the boxing for us
//
// 3. Why mark the URL visited even when the fetch failed?
//    - A URL is fetched at most once per run, good or bad
//    - The root is marked AFTER its fetch, so a page that links to
//      itself still loads once
//
// 4. Where is the session released?
//    - fetch_page() owns the session; it's dropped when that fn returns
//    - Drop runs on success AND on error, like a finally block
// -----------------------------------------------------------------------------
