//! Named configuration for the site, the parsing backend, and crawl pacing.
//!
//! Everything tunable lives here as an explicit value constructed once in
//! `main` and passed by reference: no ambient globals, no constants buried
//! in the logic that uses them.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::HarvestError;

/// Where the bulletin board lives and how its URLs are shaped.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    base: Url,
    board: String,
    menu_id: u32,
    /// Number of rows to request from the RSS listing.
    pub feed_rows: u32,
    /// Timeout for detail-page and image fetches.
    pub request_timeout: Duration,
}

impl SiteConfig {
    pub fn new(
        base_url: &str,
        board: &str,
        menu_id: u32,
        feed_rows: u32,
        request_timeout: Duration,
    ) -> Result<Self, HarvestError> {
        let base = Url::parse(base_url).map_err(|source| HarvestError::BadBaseUrl {
            url: base_url.to_owned(),
            source,
        })?;
        Ok(Self {
            base,
            board: board.to_owned(),
            menu_id,
            feed_rows,
            request_timeout,
        })
    }

    /// Base origin, used to absolutize the feed's relative item links.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn origin(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// RSS listing for the configured board.
    pub fn feed_url(&self) -> String {
        format!(
            "{}/bbs/{}/{}/rssList.do?row={}",
            self.origin(),
            self.board,
            self.menu_id,
            self.feed_rows
        )
    }

    /// Detail page for one numeric post id.
    pub fn detail_url(&self, article_id: u64) -> String {
        format!(
            "{}/bbs/{}/{}/{}/artclView.do?layout=unknown",
            self.origin(),
            self.board,
            self.menu_id,
            article_id
        )
    }
}

/// Connection settings for the external document-parsing service.
#[derive(Clone)]
pub struct OcrConfig {
    /// Service origin, e.g. `https://api.cloud.llamaindex.ai`.
    pub base_url: String,
    pub api_key: String,
    /// Language hint for recognition, e.g. `ko`.
    pub language: String,
    /// Output format requested from the service, e.g. `markdown`.
    pub result_type: String,
    /// Timeout applied to each HTTP round-trip against the service.
    pub request_timeout: Duration,
    /// Pause between job-status polls.
    pub poll_interval: Duration,
    /// How many polls before a job is declared stuck.
    pub max_polls: u32,
}

impl OcrConfig {
    pub fn new(base_url: &str, api_key: &str, language: &str, result_type: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            api_key: api_key.to_owned(),
            language: language.to_owned(),
            result_type: result_type.to_owned(),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            max_polls: 60,
        }
    }
}

impl fmt::Debug for OcrConfig {
    // keep the API key out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .field("result_type", &self.result_type)
            .field("request_timeout", &self.request_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::new(
            "https://www.hansung.ac.kr",
            "hansung",
            143,
            30,
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_feed_url_shape() {
        assert_eq!(
            site().feed_url(),
            "https://www.hansung.ac.kr/bbs/hansung/143/rssList.do?row=30"
        );
    }

    #[test]
    fn test_detail_url_shape() {
        assert_eq!(
            site().detail_url(264710),
            "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do?layout=unknown"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = SiteConfig::new("not a url", "hansung", 143, 30, Duration::from_secs(1));
        assert!(matches!(err, Err(HarvestError::BadBaseUrl { .. })));
    }

    #[test]
    fn test_ocr_config_debug_redacts_key() {
        let config = OcrConfig::new("https://api.cloud.llamaindex.ai", "sk-secret", "ko", "markdown");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
