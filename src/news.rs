use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::{info, warn};

use crate::arxiv::FetchError;
use crate::config::NewsFeed;

/// How many entries to keep per feed.
const ENTRIES_PER_FEED: usize = 10;

/// A normalized, transient news article. `kind` is the constant tag that
/// distinguishes these from papers in mixed renderings.
#[derive(Debug, Clone)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published_date: String,
    pub source: String,
    pub kind: &'static str,
}

pub struct NewsFetcher {
    client: Client,
    feeds: Vec<NewsFeed>,
}

impl NewsFetcher {
    pub fn new(feeds: Vec<NewsFeed>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Secufeed/1.0 (Research Feed Aggregator)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, feeds }
    }

    /// Fetch every configured feed. A feed that cannot be fetched or parsed
    /// is logged and contributes no articles; the others still go through.
    pub async fn fetch_all(&self) -> Vec<NewsArticle> {
        let mut all_articles = Vec::new();

        for feed in &self.feeds {
            match self.fetch_feed(feed).await {
                Ok(articles) => {
                    info!("Fetched {} articles from '{}'", articles.len(), feed.name);
                    all_articles.extend(articles);
                }
                Err(e) => {
                    warn!("Failed to fetch news feed '{}': {}", feed.name, e);
                }
            }
        }

        all_articles
    }

    async fn fetch_feed(&self, feed: &NewsFeed) -> Result<Vec<NewsArticle>, FetchError> {
        let response = self
            .client
            .get(&feed.url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        let parsed = parser::parse(&bytes[..])?;

        let articles = parsed
            .entries
            .into_iter()
            .take(ENTRIES_PER_FEED)
            .map(|entry| Self::article_from_entry(entry, &feed.name))
            .collect();

        Ok(articles)
    }

    pub fn article_from_entry(entry: feed_rs::model::Entry, source: &str) -> NewsArticle {
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        // RSS guids come through as the entry id; an empty one falls back
        // to the article's own link.
        let id = if entry.id.is_empty() {
            link.clone()
        } else {
            entry.id
        };

        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .unwrap_or_else(|| "No summary available.".to_string());

        let published_date = entry
            .published
            .or(entry.updated)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "N/A".to_string());

        NewsArticle {
            id,
            title,
            summary,
            link,
            published_date,
            source: source.to_string(),
            kind: "news",
        }
    }
}
