//! Text recovery from images embedded in a post.
//!
//! Each image costs one fetch plus one recognition round-trip, which is the
//! dominant per-post latency. Failures are strictly per-image: an image that
//! cannot be resolved, fetched, or read contributes nothing and the rest of
//! the post's images still get processed. Only non-empty recovered texts make
//! it into the joined result, so `image_content` never carries blank lines.

use itertools::Itertools;
use tracing::{debug, warn};
use url::Url;

use crate::fetch::DetailFetcher;
use crate::ocr::RecognizeAsync;

/// Recover text from every image referenced in a post's content region.
///
/// `image_srcs` are the raw `src` attributes in DOM order; each is resolved
/// against the page's final URL, so root-relative, parent-relative, and
/// protocol-relative references all work. Returns the newline-joined
/// per-image texts.
pub async fn recover_image_text<R: RecognizeAsync>(
    fetcher: &DetailFetcher,
    recognizer: &R,
    page_url: &Url,
    image_srcs: &[String],
) -> String {
    let mut texts: Vec<String> = Vec::new();
    for src in image_srcs {
        let img_url = match page_url.join(src) {
            Ok(url) => url,
            Err(e) => {
                warn!(%src, error = %e, "Skipping image with unresolvable src");
                continue;
            }
        };
        let text = extract_image_text(fetcher, recognizer, &img_url).await;
        if !text.is_empty() {
            texts.push(text);
        }
    }
    texts.join("\n")
}

/// Fetch one image and run it through the parsing backend.
///
/// Any failure degrades to an empty string; the caller drops empties.
async fn extract_image_text<R: RecognizeAsync>(
    fetcher: &DetailFetcher,
    recognizer: &R,
    img_url: &Url,
) -> String {
    let bytes = match fetcher.fetch_bytes(img_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(url = %img_url, error = %e, "Image fetch failed");
            return String::new();
        }
    };

    match recognizer.recognize(bytes, file_name_hint(img_url)).await {
        Ok(fragments) => {
            let text = fragments
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .join("\n");
            debug!(url = %img_url, chars = text.len(), "Recovered image text");
            text
        }
        Err(e) => {
            warn!(url = %img_url, error = %e, "Text recognition failed");
            String::new()
        }
    }
}

/// Last path segment of the image URL, used as the upload's filename hint.
fn file_name_hint(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("image")
}
