// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) and parse command-line arguments
// 2. Load configuration from the environment / .env
// 3. Build the page fetcher, the LLM classifier and the output sink
// 4. Run the pipeline for the requested mode
// 5. Exit with 0 on success, 1 on any error that reached the top
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod fetch;
mod llm;
mod pipeline;
mod sink;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use crawl::CrawlSettings;
use fetch::HttpPageFetcher;
use llm::{GroqClient, LlmClassifier};
use pipeline::Pipeline;
use sink::JsonFileSink;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr; RUST_LOG overrides the default level
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("deep_scraper=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let root_url = fetch::canonical_url(&cli::normalize_url(&cli.url))
        .ok_or_else(|| error::CrawlError::InvalidUrl(cli.url.clone()))?;

    info!(url = %root_url, mode = ?cli.mode, max_depth = cli.max_depth, "starting");

    let model = Arc::new(GroqClient::new(&config.llm)?);
    let classifier = Arc::new(LlmClassifier::new(model, config.llm.max_prompt_chars));

    let pipeline = Pipeline::new(
        cli.mode,
        CrawlSettings {
            max_depth: cli.max_depth,
            fetch_timeout: config.fetch.timeout,
            aggregate: cli.aggregate,
        },
        Arc::new(HttpPageFetcher::new(config.fetch.clone())),
        classifier,
        Arc::new(JsonFileSink::new(&cli.output_dir)),
    );

    let report = pipeline.run(&root_url).await?;

    if report.pages == 0 {
        println!("Could not complete the scrape.");
    } else {
        for path in &report.written {
            println!("Saved {}", path.display());
        }
        println!("Scrape completed ({} page(s) kept).", report.pages);
    }

    Ok(())
}
