use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::{error, info};

use crate::config::ArxivConfig;

/// A normalized, transient representation of one arXiv search result.
/// Produced fresh on every fetch; never persisted.
#[derive(Debug, Clone)]
pub struct PaperRecord {
    pub entry_id: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub pdf_link: String,
    pub topic: String,
}

impl PaperRecord {
    /// Authors flattened to the single-string form bookmarks store.
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Topic,
    Author,
}

impl SearchKind {
    /// Anything that isn't exactly "author" searches as a topic, matching
    /// the interest_type column's default.
    pub fn from_type_str(s: &str) -> Self {
        if s == "author" {
            SearchKind::Author
        } else {
            SearchKind::Topic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Topic => "topic",
            SearchKind::Author => "author",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed parsing failed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

pub struct ArxivClient {
    client: Client,
    api_url: String,
    max_results: usize,
}

impl ArxivClient {
    pub fn new(config: &ArxivConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Secufeed/1.0 (Research Feed Aggregator)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: config.api_url.clone(),
            max_results: config.max_results,
        }
    }

    /// The per-interest result cap from configuration.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Author searches constrain matching to author-name fields with
    /// exact-phrase semantics; topic searches pass the keyword through.
    pub fn build_query(keyword: &str, kind: SearchKind) -> String {
        let query = keyword.trim();
        match kind {
            SearchKind::Author => format!("au:\"{}\"", query),
            SearchKind::Topic => query.to_string(),
        }
    }

    pub async fn search(
        &self,
        keyword: &str,
        kind: SearchKind,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, FetchError> {
        let query = Self::build_query(keyword, kind);
        info!("Executing arXiv search with query: '{}'", query);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", &max_results.to_string()),
                ("sortBy", "lastUpdatedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        let parsed = parser::parse(&bytes[..])?;

        let papers = parsed
            .entries
            .into_iter()
            .take(max_results)
            .map(|entry| Self::paper_from_entry(entry, keyword))
            .collect();

        Ok(papers)
    }

    /// Pipeline-facing wrapper: any failure reaching or parsing arXiv is
    /// logged and coalesced to an empty list, so a single failing interest
    /// never aborts the whole aggregation.
    pub async fn search_or_empty(
        &self,
        keyword: &str,
        kind: SearchKind,
        max_results: usize,
    ) -> Vec<PaperRecord> {
        match self.search(keyword, kind, max_results).await {
            Ok(papers) => papers,
            Err(e) => {
                error!("arXiv search for '{}' failed: {}", keyword, e);
                Vec::new()
            }
        }
    }

    pub fn paper_from_entry(entry: feed_rs::model::Entry, keyword: &str) -> PaperRecord {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .unwrap_or_default();

        let authors = entry
            .authors
            .iter()
            .map(|person| person.name.clone())
            .collect();

        let published_date = entry
            .published
            .or(entry.updated)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        // arXiv marks the PDF link with title="pdf" / type="application/pdf";
        // fall back to rewriting the abstract URL.
        let pdf_link = entry
            .links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf")
                    || l.media_type.as_deref() == Some("application/pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| entry.id.replace("/abs/", "/pdf/"));

        PaperRecord {
            entry_id: entry.id,
            title,
            summary,
            authors,
            published_date,
            pdf_link,
            topic: keyword.to_string(),
        }
    }
}
