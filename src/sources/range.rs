//! Numeric id-range discovery.
//!
//! Posts are addressable directly by id, so a closed interval expands into
//! detail URLs without touching the network. No listing metadata exists in
//! this mode; date, title, author, and category all come from the detail
//! page itself.

use tracing::info;

use crate::config::SiteConfig;
use crate::models::WorkItem;

/// Expand the closed interval `[first_id, last_id]` into work items.
pub fn enumerate(site: &SiteConfig, first_id: u64, last_id: u64) -> Vec<WorkItem> {
    let items: Vec<WorkItem> = (first_id..=last_id)
        .map(|id| WorkItem {
            url: site.detail_url(id),
            pub_date: None,
            description: None,
        })
        .collect();
    info!(count = items.len(), first_id, last_id, "Enumerated id-range work items");
    items
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

    #[test]
    fn test_interval_is_closed_and_ordered() {
        let items = enumerate(&site(), 264710, 264712);
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0].url,
            "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do?layout=unknown"
        );
        assert_eq!(
            items[2].url,
            "https://www.hansung.ac.kr/bbs/hansung/143/264712/artclView.do?layout=unknown"
        );
    }

    #[test]
    fn test_single_id_interval() {
        let items = enumerate(&site(), 264710, 264710);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_no_listing_metadata() {
        let items = enumerate(&site(), 264710, 264711);
        assert!(items.iter().all(|i| i.pub_date.is_none() && i.description.is_none()));
    }

    #[test]
    fn test_inverted_interval_is_empty() {
        assert!(enumerate(&site(), 10, 5).is_empty());
    }
}
