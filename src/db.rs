use std::collections::HashSet;

use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};

/// A persisted topic or author keyword the user wants tracked.
#[derive(Debug, Clone, FromRow)]
pub struct Interest {
    pub id: i64,
    pub keyword: String,
    pub interest_type: String,
}

/// A persisted snapshot of a paper the user chose to save.
#[derive(Debug, Clone, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub entry_id: String,
    pub title: String,
    pub summary: String,
    pub authors: String,
    pub pdf_link: String,
    pub published_date: String,
}

/// Snapshot fields supplied when creating a bookmark. Stored verbatim;
/// missing form fields arrive here as empty strings.
#[derive(Debug, Clone, Default)]
pub struct BookmarkDraft {
    pub entry_id: String,
    pub title: String,
    pub summary: String,
    pub authors: String,
    pub pdf_link: String,
    pub published_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interests (
                id INTEGER PRIMARY KEY,
                keyword TEXT NOT NULL,
                interest_type TEXT NOT NULL DEFAULT 'topic'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY,
                entry_id TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                summary TEXT NOT NULL,
                authors TEXT NOT NULL,
                pdf_link TEXT NOT NULL,
                published_date TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_interests(&self) -> anyhow::Result<Vec<Interest>> {
        let interests = sqlx::query_as::<_, Interest>("SELECT * FROM interests ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(interests)
    }

    /// Insert a new interest unless the same (keyword, interest_type) pair
    /// already exists. Returns whether a row was inserted.
    pub async fn add_interest(&self, keyword: &str, interest_type: &str) -> anyhow::Result<bool> {
        let existing = sqlx::query_as::<_, Interest>(
            "SELECT * FROM interests WHERE keyword = ? AND interest_type = ?",
        )
        .bind(keyword)
        .bind(interest_type)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Ok(false);
        }

        sqlx::query("INSERT INTO interests (keyword, interest_type) VALUES (?, ?)")
            .bind(keyword)
            .bind(interest_type)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    /// Returns whether the interest existed.
    pub async fn delete_interest(&self, interest_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM interests WHERE id = ?")
            .bind(interest_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All bookmarks, newest published_date first. Dates are stored as
    /// YYYY-MM-DD strings, so string order is the display order.
    pub async fn list_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            "SELECT * FROM bookmarks ORDER BY published_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bookmarks)
    }

    pub async fn bookmarked_ids(&self) -> anyhow::Result<HashSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT entry_id FROM bookmarks")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn find_bookmark(&self, entry_id: &str) -> anyhow::Result<Option<Bookmark>> {
        let bookmark =
            sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks WHERE entry_id = ?")
                .bind(entry_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(bookmark)
    }

    /// Toggle bookmark state for a paper: delete the bookmark if one exists
    /// for this entry_id, otherwise store the supplied snapshot.
    pub async fn toggle_bookmark(&self, draft: &BookmarkDraft) -> anyhow::Result<ToggleOutcome> {
        if self.find_bookmark(&draft.entry_id).await?.is_some() {
            sqlx::query("DELETE FROM bookmarks WHERE entry_id = ?")
                .bind(&draft.entry_id)
                .execute(&self.pool)
                .await?;
            return Ok(ToggleOutcome::Removed);
        }

        sqlx::query(
            r#"
            INSERT INTO bookmarks (entry_id, title, summary, authors, pdf_link, published_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.entry_id)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.authors)
        .bind(&draft.pdf_link)
        .bind(&draft.published_date)
        .execute(&self.pool)
        .await?;

        Ok(ToggleOutcome::Added)
    }
}
