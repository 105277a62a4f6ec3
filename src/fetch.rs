//! Detail-page and image retrieval with a bounded timeout.
//!
//! The board occasionally hangs on detail views, so every request carries the
//! configured timeout. The fetcher reports the *final* response URL: the site
//! redirects some legacy post paths, and the record's canonical link has to
//! be the page that actually answered.

use std::time::Duration;

use tracing::instrument;
use url::Url;

use crate::error::SkipReason;

/// One fetched detail page.
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects; this becomes the record's canonical link.
    pub url: Url,
    pub html: String,
}

/// HTTP client for detail pages and embedded images.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    http: reqwest::Client,
}

impl DetailFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// GET one detail page.
    ///
    /// Transport failures and non-2xx statuses are per-post conditions; the
    /// caller skips the post and moves on to the next work item.
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, SkipReason> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let final_url = resp.url().clone();
        let html = resp.text().await?;
        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }

    /// GET raw bytes, used for embedded images.
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, reqwest::Error> {
        let resp = self.http.get(url.clone()).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> DetailFetcher {
        DetailFetcher::new(Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body_and_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/bbs/hansung/143/264710/artclView.do")
            .with_status(200)
            .with_body("<html><body>hello</body></html>")
            .create_async()
            .await;

        let url = format!("{}/bbs/hansung/143/264710/artclView.do", server.url());
        let page = fetcher().fetch_page(&url).await.unwrap();
        assert_eq!(page.html, "<html><body>hello</body></html>");
        assert_eq!(page.url.as_str(), url);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_follows_redirects_to_canonical_url() {
        let mut server = Server::new_async().await;
        let target = format!("{}/bbs/hansung/143/264710/artclView.do", server.url());
        let _moved = server
            .mock("GET", "/bbs/old/1/artclView.do")
            .with_status(302)
            .with_header("location", &target)
            .create_async()
            .await;
        let _page = server
            .mock("GET", "/bbs/hansung/143/264710/artclView.do")
            .with_status(200)
            .with_body("moved here")
            .create_async()
            .await;

        let url = format!("{}/bbs/old/1/artclView.do", server.url());
        let page = fetcher().fetch_page(&url).await.unwrap();
        assert_eq!(page.url.as_str(), target);
        assert_eq!(page.html, "moved here");
    }

    #[tokio::test]
    async fn test_non_2xx_status_is_a_skip() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/bbs/hansung/143/999999/artclView.do")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/bbs/hansung/143/999999/artclView.do", server.url());
        let err = fetcher().fetch_page(&url).await.unwrap_err();
        assert!(matches!(err, SkipReason::Fetch(_)));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/img/poster.png")
            .with_status(200)
            .with_body(b"\x89PNGdata".as_slice())
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/img/poster.png", server.url())).unwrap();
        let bytes = fetcher().fetch_bytes(&url).await.unwrap();
        assert_eq!(bytes, b"\x89PNGdata");
    }
}
