//! Data models for bulletin posts at each stage of the pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`WorkItem`]: one post discovered by a listing source, not yet visited
//! - [`PageFields`]: structured fields pulled from a detail page
//! - [`PostRecord`]: the assembled output row, serialized to CSV
//!
//! The board renders its UI in Korean, so the placeholder strings substituted
//! for missing structural fields use the site's own locale.

use serde::{Deserialize, Serialize};

/// Placeholder title when the title block is missing.
pub const NO_TITLE: &str = "제목 없음";
/// Placeholder author when the writer block is missing.
pub const NO_AUTHOR: &str = "작성자 없음";
/// Placeholder category when the category block is missing.
pub const NO_CATEGORY: &str = "카테고리 없음";
/// Placeholder date when neither the listing nor the page supplies one.
pub const NO_DATE: &str = "작성일 없음";

/// One unit of discovery work: a detail page to visit, plus whatever the
/// listing already knew about it.
///
/// Range mode carries no listing metadata; both options are `None` there.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// Absolute URL of the detail page.
    pub url: String,
    /// Raw publication date string from the listing, when available.
    pub pub_date: Option<String>,
    /// Listing-level summary, prepended to the page body when present.
    pub description: Option<String>,
}

/// Structured fields extracted from one detail page.
///
/// Produced by [`crate::extract::extract_fields`]. Metadata fields already
/// carry their placeholder defaults, except `date`, which stays optional
/// because its fallback depends on the discovery mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFields {
    pub title: String,
    pub author: String,
    pub category: String,
    /// Raw date from the page's write block, if present.
    pub date: Option<String>,
    /// Space-joined text of the content spans.
    pub body: String,
    /// `src` attributes of images in the content region, in DOM order.
    pub image_srcs: Vec<String>,
}

/// A fully assembled bulletin post: one row of the output dataset.
///
/// Field order here is the CSV column order. A record exists only if it has
/// textual content (a non-empty `content` or a non-empty `image_content`);
/// posts with neither are dropped before assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Listing description (when present) stacked above the page body, trimmed.
    pub content: String,
    /// Newline-joined text recovered from the post's images, in page order.
    pub image_content: String,
    /// Raw date string as the source presented it; never reparsed.
    #[serde(rename = "date")]
    pub published_at: String,
    pub title: String,
    /// Canonical detail-page URL after redirects.
    pub link: String,
    pub author: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PostRecord {
        PostRecord {
            content: "공지 내용".to_owned(),
            image_content: String::new(),
            published_at: "2024-11-01 09:30:00.0".to_owned(),
            title: "공지사항".to_owned(),
            link: "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do".to_owned(),
            author: "학사지원팀".to_owned(),
            category: "학사".to_owned(),
        }
    }

    #[test]
    fn test_published_at_serializes_as_date_column() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"date\":\"2024-11-01 09:30:00.0\""));
        assert!(!json.contains("published_at"));
    }

    #[test]
    fn test_record_round_trips_through_serde() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: PostRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_work_item_without_listing_metadata() {
        let item = WorkItem {
            url: "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do".to_owned(),
            pub_date: None,
            description: None,
        };
        assert!(item.pub_date.is_none());
        assert!(item.description.is_none());
    }
}
