//! # Bulletin Harvest
//!
//! A harvesting pipeline for a university bulletin board: discovers
//! announcement posts, extracts their text and metadata, recovers the text
//! buried in embedded images through an external document-parsing service,
//! and writes the result as a CSV dataset. A second subcommand ships that
//! dataset to a document-ingestion API.
//!
//! ## Usage
//!
//! ```sh
//! # 30 newest feed entries -> data.csv
//! bulletin_harvest crawl
//!
//! # a fixed id range instead of the feed
//! bulletin_harvest crawl --first-id 264710 --last-id 264715
//!
//! # ship the dataset
//! bulletin_harvest upload
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: enumerate post URLs from the RSS feed or an id range
//! 2. **Fetching**: download each detail page (failures skip that post only)
//! 3. **Extraction**: pull title/author/category/date/body via selectors,
//!    then recover text from embedded images one by one
//! 4. **Output**: write the record set as a BOM-prefixed CSV
//!
//! Posts are processed sequentially with a politeness delay between them;
//! the parsing service is the only collaborator that gets retries.

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dataset;
mod error;
mod extract;
mod fetch;
mod harvest;
mod images;
mod models;
mod ocr;
mod sources;
mod upload;

use cli::{Cli, Command, CrawlArgs};
use config::{OcrConfig, SiteConfig};
use fetch::DetailFetcher;
use harvest::{Harvester, Throttle};
use ocr::{LlamaParseClient, RetryRecognize};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("bulletin_harvest starting up");

    let args = Cli::parse();
    match args.command {
        Command::Crawl(crawl_args) => run_crawl(crawl_args).await?,
        Command::Upload(upload_args) => {
            upload::run(Path::new(&upload_args.input), &upload_args.endpoint).await?
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

async fn run_crawl(args: CrawlArgs) -> Result<(), Box<dyn Error>> {
    let site = SiteConfig::new(
        &args.base_url,
        &args.board,
        args.menu_id,
        args.rows,
        Duration::from_millis(args.timeout_ms),
    )?;
    let ocr_config = OcrConfig::new(
        &args.ocr_url,
        &args.api_key,
        &args.ocr_language,
        &args.ocr_result_type,
    );

    // ---- Discover work items ----
    let items = match (args.first_id, args.last_id) {
        (Some(first_id), Some(last_id)) => sources::range::enumerate(&site, first_id, last_id),
        _ => {
            let http = reqwest::Client::new();
            sources::feed::enumerate(&http, &site).await?
        }
    };
    info!(count = items.len(), "Work items enumerated");

    // ---- Harvest posts sequentially ----
    let fetcher = DetailFetcher::new(site.request_timeout)?;
    let recognizer = RetryRecognize::new(
        LlamaParseClient::new(ocr_config)?,
        3,
        Duration::from_millis(500),
    );
    let throttle = if args.delay_ms == 0 {
        Throttle::None
    } else {
        Throttle::Fixed(Duration::from_millis(args.delay_ms))
    };

    let harvester = Harvester::new(fetcher, recognizer, throttle);
    let records = harvester.run(items).await;

    // ---- Write the dataset ----
    dataset::write_dataset(Path::new(&args.out), &records)?;
    info!(path = %args.out, rows = records.len(), "Crawl finished");

    Ok(())
}
