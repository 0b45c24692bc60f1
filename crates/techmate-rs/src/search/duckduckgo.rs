//! DuckDuckGo HTML endpoint provider. No API key required.

use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use tracing::debug;

use super::{SearchFuture, SearchProvider, SearchRecord, SearchRecords};
use crate::error::SearchError;

pub const DUCKDUCKGO_BASE: &str = "https://html.duckduckgo.com";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Scrapes `html.duckduckgo.com/html/` result pages.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| SearchError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: DUCKDUCKGO_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let url = format!("{}/html/?q={}", self.base_url, urlencoding::encode(query));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        // Rate limiting comes back as 202 with a challenge page.
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SearchError::Provider(format!(
                "DuckDuckGo returned status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::Transport(format!("failed to read response: {e}")))
    }
}

impl SearchProvider for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn search<'a>(&'a self, query: &'a str, max_results: usize) -> SearchFuture<'a> {
        Box::pin(async move {
            let html = self.fetch(query).await?;
            let records = parse_page(&html, query, max_results)?;
            debug!(
                "DuckDuckGo: {} result(s) for '{query}' ({} bytes of HTML)",
                records.len(),
                html.len()
            );
            Ok(SearchRecords::new(records, max_results))
        })
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Classify a fetched page.
///
/// A bot challenge is a provider failure. A results page without organic
/// hits is [`SearchError::EmptyResult`]. Anything else that yields no
/// records is a parse failure.
pub fn parse_page(
    html: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchRecord>, SearchError> {
    let document = Html::parse_document(html);
    if document.select(&selector(".anomaly-modal, #challenge-form")?).next().is_some() {
        return Err(SearchError::Provider(
            "DuckDuckGo served a bot challenge instead of results".into(),
        ));
    }

    let records = organic_results(&document, max_results)?;
    if !records.is_empty() {
        return Ok(records);
    }
    if document.select(&selector(".no-results, #links, .results")?).next().is_some() {
        return Err(SearchError::EmptyResult {
            query: query.to_string(),
        });
    }
    Err(SearchError::Parse("page has no result list".into()))
}

/// Parse a result page into at most `max_results` organic records.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchRecord>, SearchError> {
    organic_results(&Html::parse_document(html), max_results)
}

/// Blocks missing a title or link are skipped, and so are sponsored ones.
fn organic_results(document: &Html, max_results: usize) -> Result<Vec<SearchRecord>, SearchError> {
    let result_sel = selector(".result")?;
    let link_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut records = Vec::new();
    for block in document.select(&result_sel) {
        if records.len() >= max_results {
            break;
        }
        if block.value().has_class("result--ad", CaseSensitivity::CaseSensitive) {
            continue;
        }
        let Some(link) = block.select(&link_sel).next() else {
            continue;
        };
        let title = element_text(link);
        let url = normalize_url(link.value().attr("href").unwrap_or(""));
        if title.is_empty() || url.is_empty() || is_ad_redirect(&url) {
            continue;
        }
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        records.push(SearchRecord { title, snippet, url });
    }
    Ok(records)
}

/// Sponsored links go through `duckduckgo.com/y.js`.
fn is_ad_redirect(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|u| {
        u.domain().is_some_and(|d| d.ends_with("duckduckgo.com")) && u.path() == "/y.js"
    })
}

/// Resolve `duckduckgo.com/l/?uddg=` redirect links to their destination.
/// Protocol-relative links (`//duckduckgo.com/l/...`) are handled too.
pub fn normalize_url(raw_url: &str) -> String {
    let absolute = match raw_url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => raw_url.to_string(),
    };
    let Ok(parsed) = url::Url::parse(&absolute) else {
        return raw_url.to_string();
    };

    if parsed.domain() == Some("duckduckgo.com")
        && parsed.path().starts_with("/l/")
        && let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg")
    {
        return target.into_owned();
    }

    absolute
}
