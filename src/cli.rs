//! Command-line interface definitions for the bulletin harvester.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The parsing-service API key can be provided via flag or the
//! `LLAMA_CLOUD_API_KEY` environment variable.

use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the bulletin harvester.
///
/// # Examples
///
/// ```sh
/// # Harvest the 30 newest feed entries into data.csv
/// bulletin_harvest crawl
///
/// # Harvest a numeric id range instead of the feed
/// bulletin_harvest crawl --first-id 264710 --last-id 264715
///
/// # Ship a previously written dataset to the ingestion API
/// bulletin_harvest upload --input data.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Harvest posts and write the dataset CSV
    Crawl(CrawlArgs),
    /// Merge and POST a previously written dataset to the ingestion API
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Site origin hosting the bulletin board
    #[arg(long, default_value = "https://www.hansung.ac.kr")]
    pub base_url: String,

    /// Board name segment of the bulletin URLs
    #[arg(long, default_value = "hansung")]
    pub board: String,

    /// Bulletin menu id segment of the bulletin URLs
    #[arg(long, default_value_t = 143)]
    pub menu_id: u32,

    /// Feed mode: number of rows to request from the RSS listing
    #[arg(long, default_value_t = 30)]
    pub rows: u32,

    /// Range mode: first post id, inclusive (switches discovery off the feed)
    #[arg(long, requires = "last_id")]
    pub first_id: Option<u64>,

    /// Range mode: last post id, inclusive
    #[arg(long, requires = "first_id")]
    pub last_id: Option<u64>,

    /// Output CSV path
    #[arg(short, long, default_value = "data.csv")]
    pub out: String,

    /// Pause between posts, in milliseconds (0 disables throttling)
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Timeout for detail-page and image fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Document-parsing service origin
    #[arg(long, default_value = "https://api.cloud.llamaindex.ai")]
    pub ocr_url: String,

    /// Language hint passed to the parsing service
    #[arg(long, default_value = "ko")]
    pub ocr_language: String,

    /// Output format requested from the parsing service
    #[arg(long, default_value = "markdown")]
    pub ocr_result_type: String,

    /// API key for the parsing service
    #[arg(long, env = "LLAMA_CLOUD_API_KEY", hide_env_values = true)]
    pub api_key: String,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Dataset CSV produced by a crawl run
    #[arg(short, long, default_value = "data.csv")]
    pub input: String,

    /// Document-ingestion endpoint
    #[arg(long, default_value = "https://hansung.store/api/v1/documents")]
    pub endpoint: String,
}
