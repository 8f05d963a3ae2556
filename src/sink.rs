// src/sink.rs
// =============================================================================
// This module saves the final result of a run to disk.
//
// Each output kind has a FIXED file name, so running again simply
// overwrites the previous result:
// - deep-scraped-content.json  (crawl result)
// - scraped-analysis.json      (page analysis)
//
// Files are pretty-printed JSON.
// =============================================================================

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::CrawlError;

pub const CRAWL_OUTPUT_FILE: &str = "deep-scraped-content.json";
pub const ANALYSIS_OUTPUT_FILE: &str = "scraped-analysis.json";

/// Somewhere a finished document can be stored
pub trait ResultSink: Send + Sync {
    // Returns where the document ended up
    fn persist(&self, name: &str, document: &Value) -> Result<PathBuf, CrawlError>;
}

/// Writes pretty-printed JSON files into one directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ResultSink for JsonFileSink {
    fn persist(&self, name: &str, document: &Value) -> Result<PathBuf, CrawlError> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(document)?;

        std::fs::write(&path, json).map_err(|source| CrawlError::Persistence {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
