mod arxiv;
mod config;
mod db;
mod news;
mod pipeline;
mod routes;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::arxiv::ArxivClient;
use crate::config::Config;
use crate::db::Database;
use crate::news::NewsFetcher;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secufeed=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load_or_default("config.toml")?;
    info!(
        "Tracking {} news feeds, arXiv endpoint {}",
        config.news_feeds.len(),
        config.arxiv.api_url
    );

    // Initialize database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:secufeed.db?mode=rwc".to_string());
    let db = Database::new(&database_url).await?;
    db.initialize().await?;
    info!("Database initialized");

    let db = Arc::new(db);

    // Create external source clients
    let arxiv = Arc::new(ArxivClient::new(&config.arxiv));
    let news = Arc::new(NewsFetcher::new(config.news_feeds.clone()));

    // Create app state
    let state = Arc::new(AppState { db, arxiv, news });

    // Build router
    let app = routes::app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server starting on http://localhost:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
