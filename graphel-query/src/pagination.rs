//! Pagination snapshots and their publication channels.
//!
//! A [`Page`] is the derived read-model of the last paginated fetch: row
//! count, overall total, 1-based page number, total pages, and first/last
//! flags. It is recomputed wholesale after every successful fetch and never
//! merged across fetches -- overlapping fetches are last-write-wins.
//!
//! ```rust
//! use graphel_query::Page;
//! use serde_json::json;
//!
//! let page = Page::compute(vec![json!({"id": 7})], 10, 9, 3);
//! assert_eq!(page.page, 4);
//! assert_eq!(page.pages, 4);
//! assert!(page.is_last);
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::QueryError;

/// The snapshot produced by a paginated fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Rows in the current page.
    pub count: u64,
    /// Rows matching the filter overall.
    pub total: u64,
    /// Current page, 1-based.
    pub page: u64,
    /// Total pages, `ceil(total / limit)`.
    pub pages: u64,
    /// Whether this is the first page.
    pub is_first: bool,
    /// Whether this is the last page.
    pub is_last: bool,
    /// The row data for this page.
    pub rows: Vec<Value>,
}

impl Page {
    /// Derive a snapshot from a fetch result and the offset/limit it ran with.
    ///
    /// A limit of zero is treated as one so the page arithmetic stays defined.
    pub fn compute(rows: Vec<Value>, total: u64, offset: u64, limit: u64) -> Self {
        let limit = limit.max(1);
        let page = offset / limit + 1;
        let pages = total.div_ceil(limit);
        Self {
            count: rows.len() as u64,
            total,
            page,
            pages,
            is_first: page == 1,
            is_last: page == pages,
            rows,
        }
    }
}

/// Publication channels for pagination snapshots and failures.
///
/// Both sides are `tokio::sync::watch` channels: subscribers see the latest
/// value only, which matches the last-write-wins snapshot semantics, and a
/// subscriber that drops before a fetch resolves simply never observes it.
#[derive(Debug)]
pub struct PageFeed {
    pages: watch::Sender<Option<Page>>,
    failures: watch::Sender<Option<Arc<QueryError>>>,
}

impl PageFeed {
    /// Create a feed with no snapshot yet.
    pub fn new() -> Self {
        let (pages, _) = watch::channel(None);
        let (failures, _) = watch::channel(None);
        Self { pages, failures }
    }

    /// Publish a new snapshot.
    pub fn publish(&self, page: Page) {
        let _ = self.pages.send(Some(page));
    }

    /// Publish a pagination failure.
    pub fn publish_failure(&self, error: Arc<QueryError>) {
        let _ = self.failures.send(Some(error));
    }

    /// Subscribe to snapshot updates.
    pub fn pages(&self) -> watch::Receiver<Option<Page>> {
        self.pages.subscribe()
    }

    /// Subscribe to pagination failures.
    pub fn failures(&self) -> watch::Receiver<Option<Arc<QueryError>>> {
        self.failures.subscribe()
    }
}

impl Default for PageFeed {
    fn default() -> Self {
        Self::new()
    }
}
