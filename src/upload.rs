//! Dataset upload to the document-ingestion API.
//!
//! A separate run from the crawl: reads the CSV a crawl produced, folds the
//! recovered image text into the main content column, and POSTs the slimmer
//! six-column dataset. The endpoint creates a document batch and answers
//! 201; any other status is reported to the operator and nothing is retried.

use std::path::Path;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{info, instrument};

use crate::dataset;
use crate::error::HarvestError;
use crate::models::PostRecord;

/// One uploaded row: image text folded into the content column.
#[derive(Debug, Serialize)]
struct UploadRow {
    content: String,
    date: String,
    title: String,
    link: String,
    author: String,
    category: String,
}

impl From<PostRecord> for UploadRow {
    fn from(record: PostRecord) -> Self {
        Self {
            content: merge_content(&record.content, &record.image_content),
            date: record.published_at,
            title: record.title,
            link: record.link,
            author: record.author,
            category: record.category,
        }
    }
}

/// Body text and recovered image text as a single column, trimmed.
pub fn merge_content(content: &str, image_content: &str) -> String {
    format!("{content}\n{image_content}").trim().to_owned()
}

/// Read a crawl run's dataset and POST it to the ingestion endpoint.
#[instrument(level = "info", skip_all, fields(endpoint = %endpoint))]
pub async fn run(input: &Path, endpoint: &str) -> Result<(), HarvestError> {
    let records = dataset::read_dataset(input)?;
    let rows: Vec<UploadRow> = records.into_iter().map(UploadRow::from).collect();
    let body = dataset::to_csv_bytes(&rows)?;
    info!(rows = rows.len(), bytes = body.len(), "Uploading dataset");

    let client = reqwest::Client::new();
    let resp = client
        .post(endpoint)
        .header(CONTENT_TYPE, "text/csv; charset=utf-8")
        .body(body)
        .send()
        .await
        .map_err(HarvestError::UploadTransport)?;

    let status = resp.status();
    if status == StatusCode::CREATED {
        info!(%status, "Dataset accepted");
        Ok(())
    } else {
        Err(HarvestError::UploadRejected { status })
    }
}
