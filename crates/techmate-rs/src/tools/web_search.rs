//! The `web_search` tool.
//!
//! [`WebSearch`] wraps a [`SearchProvider`] and always produces a
//! [`SearchReport`]: search failures are folded into a degraded report
//! according to the [`FallbackPolicy`], so the tool itself only fails on
//! bad arguments.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::core::{Tool, ToolFuture, parse_tool_args};
use super::names::WEB_SEARCH;
use super::spec::ToolSpec;
use crate::ToolDef;
use crate::error::{SearchError, ToolError};
use crate::model::ToolResult;
use crate::search::{SearchProvider, SearchRecord, fallback};

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Arguments of the `web_search` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// The search query.
    pub query: String,
}

/// What to hand the model when a search yields nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// An `empty` / `unavailable` report with a notice and no records.
    #[default]
    Notice,
    /// Fixed demo records, tagged `demo`.
    DemoContent,
}

/// Outcome tag of a search. Everything but `Live` is degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Live,
    Empty,
    Unavailable,
    Demo,
}

/// Payload of a `web_search` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: String,
    pub status: SearchStatus,
    /// Why the report is degraded, phrased for the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default)]
    pub records: Vec<SearchRecord>,
}

impl SearchReport {
    pub fn live(query: impl Into<String>, records: Vec<SearchRecord>) -> Self {
        Self {
            query: query.into(),
            status: SearchStatus::Live,
            notice: None,
            records,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status != SearchStatus::Live
    }

    /// Serialize as the JSON text sent back to the model.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }

    /// Parse a payload produced by [`to_payload`](Self::to_payload).
    pub fn from_payload(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }
}

/// Web search tool backed by a [`SearchProvider`].
pub struct WebSearch {
    provider: Box<dyn SearchProvider>,
    max_results: usize,
    fallback: FallbackPolicy,
    timeout: Duration,
}

impl std::fmt::Debug for WebSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearch")
            .field("provider", &self.provider.name())
            .field("max_results", &self.max_results)
            .field("fallback", &self.fallback)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WebSearch {
    pub fn new(provider: impl SearchProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            max_results: DEFAULT_MAX_RESULTS,
            fallback: FallbackPolicy::default(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Run the provider under the search timeout.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchRecord>, SearchError> {
        let records = tokio::time::timeout(self.timeout, self.provider.search(query, self.max_results))
            .await
            .map_err(|_| SearchError::Timeout(self.timeout))??;
        Ok(records.collect())
    }

    /// Search and fold any failure into a report per the fallback policy.
    pub async fn search_and_format(&self, query: &str) -> SearchReport {
        let err = match self.search(query).await {
            Ok(records) if !records.is_empty() => {
                debug!("web_search '{query}': {} live result(s)", records.len());
                return SearchReport::live(query, records);
            }
            Ok(_) => SearchError::EmptyResult {
                query: query.to_string(),
            },
            Err(e) => e,
        };

        warn!("web_search '{query}' via {} degraded: {err}", self.provider.name());
        self.degraded_report(query, &err)
    }

    fn degraded_report(&self, query: &str, err: &SearchError) -> SearchReport {
        let empty = err.is_empty_result();
        let (status, notice, records) = match (self.fallback, empty) {
            (FallbackPolicy::Notice, true) => (
                SearchStatus::Empty,
                format!(
                    "No results found for '{query}'. Answer from your own knowledge and \
                     mention that no current sources were found."
                ),
                vec![],
            ),
            (FallbackPolicy::Notice, false) => (
                SearchStatus::Unavailable,
                format!(
                    "Web search is unavailable ({err}). Answer from your own knowledge and \
                     tell the user live results could not be retrieved."
                ),
                vec![],
            ),
            (FallbackPolicy::DemoContent, true) => (
                SearchStatus::Demo,
                "Live search returned no results; these are demo records, not real search results."
                    .to_string(),
                fallback::ai_news(),
            ),
            (FallbackPolicy::DemoContent, false) => (
                SearchStatus::Demo,
                format!("Live search failed ({err}); these are demo records, not real search results."),
                fallback::tech_news(),
            ),
        };
        SearchReport {
            query: query.to_string(),
            status,
            notice: Some(notice),
            records,
        }
    }
}

impl Tool for WebSearch {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(WEB_SEARCH)
            .purpose(
                "Search the web for current information, news, tutorials, documentation, \
                 or any recent developments",
            )
            .when_to_use("You need up-to-date information or recent news")
            .when_not_to_use(
                "The question is about stable concepts you can explain directly, \
                 such as what a variable or a tuple is",
            )
            .parameters_for::<WebSearchArgs>()
            .example(
                r#"web_search(query="latest AI news")"#,
                format!("up to {} results", self.max_results),
            )
            .output_format(
                "JSON object with query, status (live, empty, unavailable, demo), \
                 an optional notice, and records of title, snippet, url",
            )
            .to_tool_def()
    }

    fn execute<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a> {
        Box::pin(async move {
            let args: WebSearchArgs = parse_tool_args(WEB_SEARCH, arguments)?;
            let query = args.query.trim();
            if query.is_empty() {
                return Err(ToolError::InvalidArguments {
                    tool: WEB_SEARCH.to_string(),
                    message: "query must not be empty".into(),
                });
            }
            let report = self.search_and_format(query).await;
            Ok(ToolResult::new(WEB_SEARCH, report.to_payload()))
        })
    }
}
