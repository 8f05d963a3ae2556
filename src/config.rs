// src/config.rs
// =============================================================================
// This module loads runtime settings from the environment.
//
// Where values come from:
// 1. A .env file in the working directory (if there is one), via dotenvy
// 2. The process environment
// 3. Built-in defaults for everything except the API key
//
// The API key is optional HERE on purpose: a missing key only becomes an
// error the first time we actually call the language model.
//
// Rust concepts:
// - Option<String>: a value that might be missing
// - Closures as parameters: lets tests pass a fake environment
// =============================================================================

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_READY_SELECTOR: &str = "body";
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 12_000;

/// Settings for the language model service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Body text longer than this is cut before being sent for analysis
    pub max_prompt_chars: usize,
}

/// Settings for loading pages
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Client identity sent with every request of a traversal
    pub user_agent: String,
    pub timeout: Duration,
    /// CSS selector that must be present before we call a page "ready"
    pub ready_selector: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from .env + environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Builds the config from any key -> value lookup
    //
    // Parameters:
    //   lookup: returns Some(value) when the variable is set
    //
    // Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_ms = match get("SCRAPER_FETCH_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("SCRAPER_FETCH_TIMEOUT_MS must be a whole number of milliseconds")?,
            None => DEFAULT_FETCH_TIMEOUT_MS,
        };

        let max_prompt_chars = match get("SCRAPER_MAX_PROMPT_CHARS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("SCRAPER_MAX_PROMPT_CHARS must be a whole number")?,
            None => DEFAULT_MAX_PROMPT_CHARS,
        };

        Ok(Self {
            llm: LlmConfig {
                api_key: get("GROQ_API_KEY"),
                model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                max_prompt_chars,
            },
            fetch: FetchConfig {
                user_agent: get("SCRAPER_USER_AGENT")
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                timeout: Duration::from_millis(timeout_ms),
                ready_selector: get("SCRAPER_READY_SELECTOR")
                    .unwrap_or_else(|| DEFAULT_READY_SELECTOR.to_string()),
            },
        })
    }
}
