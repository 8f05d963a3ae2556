// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The only argument most people need is the URL:
//   deep-scraper minecraft.net/en-us
// Everything else has a sensible default.
// =============================================================================

use clap::Parser;

use crate::crawl::DEFAULT_MAX_DEPTH;
use crate::pipeline::Mode;

/// Page we crawl when no URL is given
pub const DEFAULT_TARGET: &str = "minecraft.net/en-us";

#[derive(Parser, Debug)]
#[command(
    name = "deep-scraper",
    version = "0.1.0",
    about = "Crawl a web page and let a language model choose which links to follow",
    long_about = "deep-scraper loads a page, asks a language model (Groq) which of its links are \
                  worth following, crawls those a few hops deep, and saves the result as JSON. \
                  It can also ask the model for a structured analysis of the page."
)]
pub struct Cli {
    /// URL or bare hostname to start from (https:// is added if missing)
    #[arg(default_value = DEFAULT_TARGET)]
    pub url: String,

    /// What to produce
    #[arg(long, value_enum, default_value_t = Mode::Crawl)]
    pub mode: Mode,

    /// How many link hops to follow from the starting page
    ///
    /// 0 = just the starting page
    /// 1 = starting page + the links the model picked on it
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Save every crawled page as a tree instead of only the starting page
    #[arg(long)]
    pub aggregate: bool,

    /// Directory for the output JSON files
    #[arg(long, default_value = ".")]
    pub output_dir: std::path::PathBuf,
}

// Adds https:// when the user typed a bare hostname
//
// Examples:
//   "minecraft.net/en-us"  -> "https://minecraft.net/en-us"
//   "http://example.com"   -> "http://example.com" (left alone)
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}
