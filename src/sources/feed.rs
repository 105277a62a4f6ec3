//! RSS feed discovery.
//!
//! The board exposes its newest posts at `rssList.do`. Item links come back
//! as paths relative to the site origin and are absolutized here, so the
//! fetcher downstream only ever sees complete URLs.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument, warn};

use crate::config::SiteConfig;
use crate::error::HarvestError;
use crate::models::WorkItem;

/// Enumerate work items from the board's RSS listing.
///
/// Unlike everything downstream, a failure here is fatal: with no listing
/// there is nothing to crawl.
#[instrument(level = "info", skip_all)]
pub async fn enumerate(
    http: &reqwest::Client,
    site: &SiteConfig,
) -> Result<Vec<WorkItem>, HarvestError> {
    let feed_url = site.feed_url();
    let xml = http
        .get(&feed_url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(HarvestError::FeedFetch)?
        .text()
        .await
        .map_err(HarvestError::FeedFetch)?;

    let items = parse_feed(&xml, site)?;
    info!(count = items.len(), url = %feed_url, "Enumerated feed work items");
    debug!(?items, "Feed work items");
    Ok(items)
}

#[derive(Clone, Copy)]
enum Field {
    Link,
    PubDate,
    Description,
}

/// Pull `(link, pubDate, description)` out of every `<item>`, in document
/// order. Items whose link cannot be resolved against the site origin are
/// logged and dropped; they cannot be fetched anyway.
fn parse_feed(xml: &str, site: &SiteConfig) -> Result<Vec<WorkItem>, HarvestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut items = Vec::new();

    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut link = String::new();
    let mut pub_date = String::new();
    let mut description = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    link.clear();
                    pub_date.clear();
                    description.clear();
                }
                b"link" if in_item => field = Some(Field::Link),
                b"pubDate" if in_item => field = Some(Field::PubDate),
                b"description" if in_item => field = Some(Field::Description),
                _ => field = None,
            },
            Event::Text(e) => {
                if in_item {
                    if let Some(f) = field {
                        let decoded = e.decode().map_err(quick_xml::Error::from)?;
                        let text = quick_xml::escape::unescape(&decoded)?;
                        target(f, &mut link, &mut pub_date, &mut description).push_str(&text);
                    }
                }
            }
            Event::CData(e) => {
                if in_item {
                    if let Some(f) = field {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        target(f, &mut link, &mut pub_date, &mut description).push_str(&text);
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"item" {
                    in_item = false;
                    if link.trim().is_empty() {
                        warn!("Skipping feed item without a link");
                    } else {
                        match site.base().join(link.trim()) {
                            Ok(url) => items.push(WorkItem {
                                url: url.to_string(),
                                pub_date: non_empty(&pub_date),
                                description: non_empty(&description),
                            }),
                            Err(e) => {
                                warn!(link = %link.trim(), error = %e, "Skipping feed item with unresolvable link")
                            }
                        }
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn target<'a>(
    field: Field,
    link: &'a mut String,
    pub_date: &'a mut String,
    description: &'a mut String,
) -> &'a mut String {
    match field {
        Field::Link => link,
        Field::PubDate => pub_date,
        Field::Description => description,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

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

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>공지사항</title>
    <link>/bbs/hansung/143/rssList.do</link>
    <item>
      <title>수강신청 안내</title>
      <link>/bbs/hansung/143/264710/artclView.do</link>
      <pubDate>2024-11-01 09:30:00.0</pubDate>
      <description><![CDATA[2025학년도 1학기 수강신청 일정 안내]]></description>
    </item>
    <item>
      <title>장학금 공고</title>
      <link>/bbs/hansung/143/264711/artclView.do</link>
      <pubDate>2024-11-02 10:00:00.0</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_items_come_back_in_document_order() {
        let items = parse_feed(FEED, &site()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].url,
            "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do"
        );
        assert_eq!(
            items[1].url,
            "https://www.hansung.ac.kr/bbs/hansung/143/264711/artclView.do"
        );
    }

    #[test]
    fn test_cdata_description_is_captured() {
        let items = parse_feed(FEED, &site()).unwrap();
        assert_eq!(
            items[0].description.as_deref(),
            Some("2025학년도 1학기 수강신청 일정 안내")
        );
        assert_eq!(items[0].pub_date.as_deref(), Some("2024-11-01 09:30:00.0"));
    }

    #[test]
    fn test_missing_description_stays_none() {
        let items = parse_feed(FEED, &site()).unwrap();
        assert!(items[1].description.is_none());
    }

    #[test]
    fn test_channel_level_link_is_not_an_item() {
        let items = parse_feed(FEED, &site()).unwrap();
        assert!(items.iter().all(|i| i.url.contains("artclView.do")));
    }

    #[test]
    fn test_malformed_xml_is_fatal() {
        let result = parse_feed("<rss><channel><item></rss>", &site());
        assert!(matches!(result, Err(HarvestError::FeedParse(_))));
    }

    #[test]
    fn test_empty_feed_yields_no_items() {
        let items = parse_feed(
            r#"<rss version="2.0"><channel><title>empty</title></channel></rss>"#,
            &site(),
        )
        .unwrap();
        assert!(items.is_empty());
    }
}
