//! The per-post assembly pipeline.
//!
//! [`Harvester`] drives each work item through fetch → extract → image text
//! recovery, then decides whether the post earns a record. The contract for
//! one post is explicit in the processing step's return type:
//!
//! - `Ok(Some(record))`: the post had textual content and was assembled
//! - `Ok(None)`: the post was reachable but textless; dropped silently
//! - `Err(reason)`: the post could not be processed; logged and skipped
//!
//! Failures never cross the post boundary: the batch always runs to
//! completion.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::SkipReason;
use crate::extract;
use crate::fetch::DetailFetcher;
use crate::images;
use crate::models::{NO_DATE, PostRecord, WorkItem};
use crate::ocr::RecognizeAsync;

/// Politeness delay applied after each post.
///
/// Injectable so production runs pace themselves while tests run flat out.
#[derive(Debug, Clone, Copy)]
pub enum Throttle {
    None,
    Fixed(Duration),
}

impl Throttle {
    pub async fn pause(&self) {
        if let Throttle::Fixed(delay) = self {
            sleep(*delay).await;
        }
    }
}

/// Sequentially processes work items into post records.
#[derive(Debug)]
pub struct Harvester<R> {
    fetcher: DetailFetcher,
    recognizer: R,
    throttle: Throttle,
}

impl<R: RecognizeAsync> Harvester<R> {
    pub fn new(fetcher: DetailFetcher, recognizer: R, throttle: Throttle) -> Self {
        Self {
            fetcher,
            recognizer,
            throttle,
        }
    }

    /// Process every work item in discovery order.
    pub async fn run(&self, items: Vec<WorkItem>) -> Vec<PostRecord> {
        let total = items.len();
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for item in items {
            match self.process(&item).await {
                Ok(Some(record)) => {
                    debug!(link = %record.link, title = %record.title, "Assembled post record");
                    records.push(record);
                }
                Ok(None) => debug!(url = %item.url, "Post has no textual content; dropped"),
                Err(e) => {
                    skipped += 1;
                    warn!(url = %item.url, error = %e, "Skipping post");
                }
            }
            self.throttle.pause().await;
        }

        info!(total, kept = records.len(), skipped, "Harvest completed");
        records
    }

    /// One post, start to finish.
    async fn process(&self, item: &WorkItem) -> Result<Option<PostRecord>, SkipReason> {
        let page = self.fetcher.fetch_page(&item.url).await?;
        let fields = extract::extract_fields(&page.html);
        let image_content = images::recover_image_text(
            &self.fetcher,
            &self.recognizer,
            &page.url,
            &fields.image_srcs,
        )
        .await;
        let content = compose_content(item.description.as_deref(), &fields.body);

        // keep only posts that carry some text, from the body or an image
        if content.is_empty() && image_content.is_empty() {
            return Ok(None);
        }

        let published_at = item
            .pub_date
            .clone()
            .or(fields.date)
            .unwrap_or_else(|| NO_DATE.to_owned());

        Ok(Some(PostRecord {
            content,
            image_content,
            published_at,
            title: fields.title,
            link: page.url.to_string(),
            author: fields.author,
            category: fields.category,
        }))
    }
}

/// Listing description (feed mode) stacked above the page body, trimmed.
pub fn compose_content(description: Option<&str>, body: &str) -> String {
    match description {
        Some(description) => format!("{description}\n{body}").trim().to_owned(),
        None => body.trim().to_owned(),
    }
}
