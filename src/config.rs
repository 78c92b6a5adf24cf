use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub arxiv: ArxivConfig,
    #[serde(default = "default_news_feeds")]
    pub news_feeds: Vec<NewsFeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArxivConfig {
    /// Base URL of the arXiv query API
    #[serde(default = "default_arxiv_api_url")]
    pub api_url: String,
    /// How many results to request per interest
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsFeed {
    pub name: String,
    pub url: String,
}

fn default_arxiv_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_max_results() -> usize {
    50
}

fn default_news_feeds() -> Vec<NewsFeed> {
    vec![
        NewsFeed {
            name: "The Hacker News".to_string(),
            url: "http://feeds.feedburner.com/TheHackerNews".to_string(),
        },
        NewsFeed {
            name: "Dark Reading".to_string(),
            url: "https://darkreading.com/rss.xml".to_string(),
        },
        NewsFeed {
            name: "Security Week".to_string(),
            url: "https://securityweek.com/feed/".to_string(),
        },
    ]
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_arxiv_api_url(),
            max_results: default_max_results(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arxiv: ArxivConfig::default(),
            news_feeds: default_news_feeds(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load a config file, falling back to the built-in defaults when the
    /// file does not exist. A present-but-malformed file is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
