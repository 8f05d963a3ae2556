// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP with reqwest.
//
// How one fetch works:
// 1. open_session() builds a brand new reqwest Client (our "browser")
//    with the configured user-agent
// 2. fetch() downloads the page and parses it, all inside one time limit
// 3. The session is dropped by the caller, which closes its connections
//
// Failure modes:
// - Client can't be built          -> ResourceAcquisition (fatal)
// - Whole fetch takes too long     -> FetchTimeout
// - Network error / non-2xx status -> Fetch
// - Ready element never shows up   -> Fetch
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::{extract_snapshot, FetchSession, PageFetcher, PageSnapshot};
use crate::config::FetchConfig;
use crate::error::CrawlError;

/// Page fetcher that opens one reqwest client per page
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    config: FetchConfig,
}

impl HttpPageFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn open_session(&self) -> Result<Box<dyn FetchSession>, CrawlError> {
        let client = Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            // No pooled connections outlive the session
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| CrawlError::ResourceAcquisition(e.to_string()))?;

        Ok(Box::new(HttpSession {
            client,
            ready_selector: self.config.ready_selector.clone(),
        }))
    }
}

// One page load's worth of HTTP client
struct HttpSession {
    client: Client,
    ready_selector: String,
}

#[async_trait]
impl FetchSession for HttpSession {
    async fn fetch(&mut self, url: &str, timeout: Duration) -> Result<PageSnapshot, CrawlError> {
        let client = &self.client;
        let ready_selector = self.ready_selector.as_str();

        with_deadline(url, timeout, async move {
            let response = client.get(url).send().await.map_err(|e| fetch_error(url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(CrawlError::Fetch {
                    url: url.to_string(),
                    reason: format!("HTTP {}", status.as_u16()),
                });
            }

            let html = response.text().await.map_err(|e| fetch_error(url, e))?;
            debug!(url, bytes = html.len(), "downloaded page");

            extract_snapshot(&html, ready_selector).map_err(|reason| CrawlError::Fetch {
                url: url.to_string(),
                reason,
            })
        })
        .await
    }
}

// Runs a fetch future under the per-page wait bound
//
// Parameters:
//   url: only used for the error message
//   timeout: how long the whole load + ready check may take
//   fetch: the work to bound
async fn with_deadline<F>(
    url: &str,
    timeout: Duration,
    fetch: F,
) -> Result<PageSnapshot, CrawlError>
where
    F: Future<Output = Result<PageSnapshot, CrawlError>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => result,
        Err(_elapsed) => Err(CrawlError::FetchTimeout {
            url: url.to_string(),
            timeout,
        }),
    }
}

fn fetch_error(url: &str, error: reqwest::Error) -> CrawlError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    CrawlError::Fetch {
        url: url.to_string(),
        reason,
    }
}
