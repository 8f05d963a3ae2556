// src/pipeline.rs
// =============================================================================
// This module ties one run together: crawl and/or analyze, then save.
//
// Modes:
// - crawl:              crawl from the root, save the root page
// - analyze:            load ONLY the root page, save an LLM analysis of it
// - crawl-then-analyze: both of the above, crawl first
//
// Rules that hold in every mode:
// - If the root page can't be loaded, nothing is written at all
// - Failing to produce an analysis just skips the analysis file
// - Failing to WRITE a file doesn't stop the rest of the run; the first
//   such error is returned once everything else is done
// =============================================================================

use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::crawl::{CrawlController, CrawlSettings};
use crate::error::CrawlError;
use crate::fetch::{canonical_url, PageFetcher};
use crate::llm::RelevanceClassifier;
use crate::sink::{ResultSink, ANALYSIS_OUTPUT_FILE, CRAWL_OUTPUT_FILE};

/// What a run should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Crawl and save the root page
    Crawl,
    /// Analyze the root page only
    Analyze,
    /// Crawl, save, then analyze the root page
    CrawlThenAnalyze,
}

impl Mode {
    fn crawls(self) -> bool {
        matches!(self, Mode::Crawl | Mode::CrawlThenAnalyze)
    }

    fn analyzes(self) -> bool {
        matches!(self, Mode::Analyze | Mode::CrawlThenAnalyze)
    }
}

/// What a finished run did
#[derive(Debug, Default)]
pub struct RunReport {
    /// Pages kept in the crawl result (0 when the root failed)
    pub pages: usize,
    /// Files written, in order
    pub written: Vec<PathBuf>,
}

pub struct Pipeline {
    controller: CrawlController,
    classifier: Arc<dyn RelevanceClassifier>,
    sink: Arc<dyn ResultSink>,
    mode: Mode,
    aggregate: bool,
}

impl Pipeline {
    pub fn new(
        mode: Mode,
        mut settings: CrawlSettings,
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn RelevanceClassifier>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        // Analysis alone never follows links
        if !mode.crawls() {
            settings.max_depth = 0;
        }
        let aggregate = settings.aggregate;

        Self {
            controller: CrawlController::new(fetcher, classifier.clone(), settings),
            classifier,
            sink,
            mode,
            aggregate,
        }
    }

    // Runs the configured mode against one root URL
    //
    // The root is spelled the same way extracted links are
    //
    // Returns: Err for an unusable root URL, a fatal crawl error or a
    // failed write
    pub async fn run(&self, root_url: &str) -> Result<RunReport, CrawlError> {
        let root_url = canonical_url(root_url)
            .ok_or_else(|| CrawlError::InvalidUrl(root_url.to_string()))?;
        let root_url = root_url.as_str();

        let root = match self.controller.crawl_from(root_url).await? {
            Some(root) => root,
            None => {
                warn!(url = root_url, "could not complete the scrape, nothing written");
                return Ok(RunReport::default());
            }
        };

        let mut report = RunReport {
            pages: root.page_count(),
            written: Vec::new(),
        };
        let mut first_write_error = None;

        if self.mode.crawls() {
            let outcome = if self.aggregate {
                self.save(CRAWL_OUTPUT_FILE, &root)
            } else {
                self.save(CRAWL_OUTPUT_FILE, &root.snapshot)
            };
            record(outcome, &mut report, &mut first_write_error);
        }

        if self.mode.analyzes() {
            match self.classifier.summarize(&root.snapshot).await {
                Ok(analysis) => {
                    let outcome = self.save(ANALYSIS_OUTPUT_FILE, &analysis);
                    record(outcome, &mut report, &mut first_write_error);
                }
                Err(e) => warn!(url = root_url, error = %e, "no analysis produced, skipping"),
            }
        }

        match first_write_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    fn save<T: Serialize>(&self, name: &str, document: &T) -> Result<PathBuf, CrawlError> {
        let value = serde_json::to_value(document)?;
        let path = self.sink.persist(name, &value)?;
        info!(path = %path.display(), "saved");
        Ok(path)
    }
}

// Keeps the path on success, or the first error seen
fn record(
    outcome: Result<PathBuf, CrawlError>,
    report: &mut RunReport,
    first_error: &mut Option<CrawlError>,
) {
    match outcome {
        Ok(path) => report.written.push(path),
        Err(e) => {
            warn!(error = %e, "could not save result");
            if first_error.is_none() {
                *first_error = Some(e);
            }
        }
    }
}
