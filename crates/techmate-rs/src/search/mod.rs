//! Web search providers.
//!
//! A [`SearchProvider`] turns a query into an ordered, finite,
//! single-pass sequence of [`SearchRecord`]s. "Nothing found" and "search
//! failed" are distinct: the first is [`SearchError::EmptyResult`], the
//! rest of [`SearchError`] covers the second.
//!
//! - [`duckduckgo`]: HTML endpoint scraper.
//! - [`fallback`]: fixed demo records, substituted only when asked for.

pub mod duckduckgo;
pub mod fallback;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

pub use duckduckgo::DuckDuckGo;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchRecord {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// Records returned by one search, consumed once.
#[derive(Debug)]
pub struct SearchRecords {
    inner: std::vec::IntoIter<SearchRecord>,
}

impl SearchRecords {
    /// Wrap `records`, keeping at most `max_results` of them.
    pub fn new(mut records: Vec<SearchRecord>, max_results: usize) -> Self {
        records.truncate(max_results);
        Self {
            inner: records.into_iter(),
        }
    }
}

impl Iterator for SearchRecords {
    type Item = SearchRecord;

    fn next(&mut self) -> Option<SearchRecord> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SearchRecords {}

/// Boxed future returned by [`SearchProvider::search`].
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SearchRecords, SearchError>> + Send + 'a>>;

/// A third-party search backend.
pub trait SearchProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Search for `query`, returning at most `max_results` records.
    /// Zero hits is [`SearchError::EmptyResult`], never an empty `Ok`.
    fn search<'a>(&'a self, query: &'a str, max_results: usize) -> SearchFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> SearchRecord {
        SearchRecord::new(format!("t{n}"), "s", format!("https://e.com/{n}"))
    }

    #[test]
    fn records_capped_and_ordered() {
        let records = SearchRecords::new((0..8).map(record).collect(), 5);
        assert_eq!(records.len(), 5);
        let titles: Vec<String> = records.map(|r| r.title).collect();
        assert_eq!(titles, ["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn records_single_pass() {
        let mut records = SearchRecords::new(vec![record(1)], 5);
        assert!(records.next().is_some());
        assert!(records.next().is_none());
        assert_eq!(records.len(), 0);
    }
}
