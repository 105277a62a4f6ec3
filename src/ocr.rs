//! Document-parsing (OCR) backend client with bounded retry logic.
//!
//! This module provides the interface to the external parsing service that
//! turns image bytes into text fragments. The service runs jobs
//! asynchronously: upload the payload, poll the job until it reaches a
//! terminal state, then download the result document.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`RecognizeAsync`]: Core trait defining async image-to-text recognition
//! - [`LlamaParseClient`]: The real REST client (upload → poll → result)
//! - [`RetryRecognize`]: Decorator that adds retry logic to any
//!   `RecognizeAsync` implementation
//!
//! # Retry Strategy
//!
//! - Retries apply to transient transport failures only; a job the service
//!   itself rejected fails immediately
//! - Exponential backoff starting at the configured base delay
//! - Maximum delay capped at 5 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use std::fmt;
use std::time::{Duration, Instant};

use rand::{Rng, rng};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::config::OcrConfig;
use crate::error::OcrError;

/// Trait for async image-to-text recognition.
///
/// Implementors take one image payload plus a filename hint and return the
/// text fragments the backend recovered from it, in document order. The
/// fragments come back raw; trimming and empty-filtering belong to the
/// caller aggregating them.
pub trait RecognizeAsync {
    /// Submit one image and receive its extracted text fragments.
    async fn recognize(&self, bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, OcrError>;
}

#[derive(Debug, Deserialize)]
struct JobCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    #[serde(default)]
    pages: Vec<ResultPage>,
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    md: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// REST client for a LlamaParse-style document-parsing service.
///
/// The service is a black box: it accepts any byte payload with a filename
/// hint and either recovers text or returns empty fragments. Language and
/// output-format hints ride along on the upload form.
#[derive(Debug, Clone)]
pub struct LlamaParseClient {
    http: reqwest::Client,
    config: OcrConfig,
}

impl LlamaParseClient {
    pub fn new(config: OcrConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn submit(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, OcrError> {
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new()
            .part("file", part)
            .text("language", self.config.language.clone())
            .text("result_type", self.config.result_type.clone());

        let job: JobCreated = self
            .http
            .post(self.endpoint("/api/v1/parsing/upload"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(job_id = %job.id, "Parse job created");
        Ok(job.id)
    }

    async fn wait_for_completion(&self, id: &str) -> Result<(), OcrError> {
        let mut status = String::new();
        for _ in 0..self.config.max_polls {
            let current: JobStatus = self
                .http
                .get(self.endpoint(&format!("/api/v1/parsing/job/{id}")))
                .bearer_auth(&self.config.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            status = current.status;

            match status.as_str() {
                "SUCCESS" => return Ok(()),
                "ERROR" | "CANCELED" => {
                    return Err(OcrError::JobFailed {
                        id: id.to_owned(),
                        status,
                    });
                }
                _ => sleep(self.config.poll_interval).await,
            }
        }
        Err(OcrError::PollExhausted {
            id: id.to_owned(),
            status,
            polls: self.config.max_polls,
        })
    }

    async fn fetch_fragments(&self, id: &str) -> Result<Vec<String>, OcrError> {
        let result: JobResult = self
            .http
            .get(self.endpoint(&format!("/api/v1/parsing/job/{id}/result/json")))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(result
            .pages
            .into_iter()
            .filter_map(|page| page.md.or(page.text))
            .collect())
    }
}

impl RecognizeAsync for LlamaParseClient {
    #[instrument(level = "info", skip_all, fields(%file_name, bytes = bytes.len()))]
    async fn recognize(&self, bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, OcrError> {
        let t0 = Instant::now();
        let id = self.submit(bytes, file_name).await?;
        self.wait_for_completion(&id).await?;
        let fragments = self.fetch_fragments(&id).await?;
        info!(
            job_id = %id,
            fragments = fragments.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Recognition finished"
        );
        Ok(fragments)
    }
}

/// Wrapper that adds exponential backoff retry logic to any
/// [`RecognizeAsync`] implementation.
///
/// The recognition round-trip is the dominant per-post cost and its failures
/// are overwhelmingly transient, so this decorator retries transient
/// transport failures (and nothing else) with backoff and jitter:
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryRecognize<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryRecognize<T>
where
    T: RecognizeAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl<T> fmt::Debug for RetryRecognize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryRecognize")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> RecognizeAsync for RetryRecognize<T>
where
    T: RecognizeAsync,
{
    #[instrument(level = "debug", skip_all)]
    async fn recognize(&self, bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, OcrError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.recognize(bytes.clone(), file_name).await {
                Ok(fragments) => return Ok(fragments),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !e.is_transient() || attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "recognize() giving up"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "recognize() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
