//! Error taxonomy for the harvest pipeline.
//!
//! Three tiers, matching how far a failure is allowed to propagate:
//! - [`HarvestError`]: fatal, aborts the run (no listing means no work)
//! - [`SkipReason`]: per-post, the post is logged and skipped
//! - [`OcrError`]: per-image, degrades to empty recovered text
//!
//! Recoverable failures never cross their boundary: a dead image never kills
//! its post, a dead post never kills the batch.

use thiserror::Error;

/// Conditions that abort the whole run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The listing feed could not be fetched; there is nothing to enumerate.
    #[error("feed request failed: {0}")]
    FeedFetch(#[source] reqwest::Error),

    #[error("feed XML is malformed: {0}")]
    FeedParse(#[from] quick_xml::Error),

    #[error("feed text could not be decoded: {0}")]
    FeedDecode(#[from] quick_xml::escape::EscapeError),

    #[error("invalid base URL {url:?}: {source}")]
    BadBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("upload request failed: {0}")]
    UploadTransport(#[source] reqwest::Error),

    /// The ingestion endpoint accepts with 201 and nothing else.
    #[error("ingestion endpoint answered {status} instead of 201")]
    UploadRejected { status: reqwest::StatusCode },
}

/// Why one post was skipped. The batch keeps going.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Transport failure or non-2xx status on the detail page.
    #[error("detail page fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Failures from the document-parsing backend, scoped to one image.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("parse service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service finished the job in a terminal non-success state.
    #[error("parse job {id} ended in status {status:?}")]
    JobFailed { id: String, status: String },

    /// The job never reached a terminal state within the poll budget.
    #[error("parse job {id} still {status:?} after {polls} polls")]
    PollExhausted {
        id: String,
        status: String,
        polls: u32,
    },
}

impl OcrError {
    /// Transient transport conditions worth another attempt. Anything the
    /// service itself decided (a failed job, a 4xx) is not retried.
    pub fn is_transient(&self) -> bool {
        match self {
            OcrError::Transport(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}
