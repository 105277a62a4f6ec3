//! Structural field extraction from detail-page HTML.
//!
//! Everything here is a pure function over the document text, so it is
//! testable offline against captured fixtures. Selector misses never fail a
//! post: absent metadata degrades to the documented placeholder.
//!
//! Extraction is scoped to the page's `.contents` region when one exists;
//! navigation chrome outside it carries its own stray images and spans.

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::{NO_AUTHOR, NO_CATEGORY, NO_TITLE, PageFields};

static CONTENT_REGION: Lazy<Selector> = Lazy::new(|| Selector::parse(".contents").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".view-title").unwrap());
static WRITER: Lazy<Selector> = Lazy::new(|| Selector::parse(".writer dd").unwrap());
static CATEGORY: Lazy<Selector> = Lazy::new(|| Selector::parse(".cate dd").unwrap());
static WRITE_DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".write dd").unwrap());
static BODY_SPANS: Lazy<Selector> = Lazy::new(|| Selector::parse(".view-con span").unwrap());
static IMAGES: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Apply the board's structural selectors to one detail page.
pub fn extract_fields(html: &str) -> PageFields {
    let document = Html::parse_document(html);
    let root = document
        .select(&CONTENT_REGION)
        .next()
        .unwrap_or_else(|| document.root_element());

    let title = first_text(root, &TITLE).unwrap_or_else(|| NO_TITLE.to_owned());
    let author = first_text(root, &WRITER).unwrap_or_else(|| NO_AUTHOR.to_owned());
    let category = first_text(root, &CATEGORY).unwrap_or_else(|| NO_CATEGORY.to_owned());
    let date = first_text(root, &WRITE_DATE);

    let body = root
        .select(&BODY_SPANS)
        .map(stripped_text)
        .filter(|t| !t.is_empty())
        .join(" ");

    let image_srcs = root
        .select(&IMAGES)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_owned)
        .collect();

    PageFields {
        title,
        author,
        category,
        date,
        body,
        image_srcs,
    }
}

/// Text of the first match, `None` when nothing matches or the match is
/// blank.
fn first_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    root.select(selector)
        .next()
        .map(stripped_text)
        .filter(|t| !t.is_empty())
}

/// Element text with every text node trimmed and empties dropped before
/// concatenation.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
