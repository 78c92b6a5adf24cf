use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header::REFERER, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::services::{ServeDir, ServeFile};

use crate::arxiv::{ArxivClient, PaperRecord, SearchKind};
use crate::db::{Bookmark, BookmarkDraft, Database, Interest};
use crate::news::{NewsArticle, NewsFetcher};
use crate::pipeline::{self, paginate};

const SEARCH_MAX_RESULTS: usize = 20;

pub struct AppState {
    pub db: Arc<Database>,
    pub arxiv: Arc<ArxivClient>,
    pub news: Arc<NewsFetcher>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/page/:page", get(index_page))
        .route("/add", post(add_interest))
        .route("/delete/:interest_id", get(delete_interest))
        .route("/bookmarks", get(bookmarks))
        .route("/toggle_bookmark", post(toggle_bookmark))
        .route("/search", get(search_form).post(search_submit))
        .route("/news", get(news))
        .route("/news/page/:page", get(news_page))
        .route_service("/sw.js", ServeFile::new("static/sw.js"))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

/// A paper plus its current bookmark state, ready for rendering.
pub struct PaperView {
    pub paper: PaperRecord,
    pub bookmarked: bool,
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub papers: Vec<PaperView>,
    pub interests: Vec<Interest>,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Template)]
#[template(path = "bookmarks.html")]
pub struct BookmarksTemplate {
    pub papers: Vec<Bookmark>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub searched: bool,
    pub query: String,
    pub papers: Vec<PaperView>,
}

#[derive(Template)]
#[template(path = "news.html")]
pub struct NewsTemplate {
    pub articles: Vec<NewsArticle>,
    pub current_page: usize,
    pub total_pages: usize,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

fn annotate(papers: Vec<PaperRecord>, bookmarked: &std::collections::HashSet<String>) -> Vec<PaperView> {
    papers
        .into_iter()
        .map(|paper| {
            let bookmarked = bookmarked.contains(&paper.entry_id);
            PaperView { paper, bookmarked }
        })
        .collect()
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    render_home(state, 1).await
}

pub async fn index_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    render_home(state, page).await
}

async fn render_home(state: Arc<AppState>, page: usize) -> Result<HtmlTemplate<IndexTemplate>, AppError> {
    let interests = state.db.list_interests().await?;
    let merged = pipeline::aggregate_papers(&state.db, &state.arxiv).await?;

    let paged = paginate(&merged.papers, page);

    Ok(HtmlTemplate(IndexTemplate {
        papers: annotate(paged.items, &merged.bookmarked),
        interests,
        current_page: paged.current_page,
        total_pages: paged.total_pages,
    }))
}

#[derive(Deserialize)]
pub struct AddInterestForm {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub interest_type: String,
}

pub async fn add_interest(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddInterestForm>,
) -> Result<Redirect, AppError> {
    let keyword = form.keyword.trim();
    let interest_type = form.interest_type.trim();

    // Blank submissions and already-tracked pairs are silently dropped
    if !keyword.is_empty() && !interest_type.is_empty() {
        state.db.add_interest(keyword, interest_type).await?;
    }

    Ok(Redirect::to("/"))
}

pub async fn delete_interest(
    State(state): State<Arc<AppState>>,
    Path(interest_id): Path<i64>,
) -> Result<Response, AppError> {
    if state.db.delete_interest(interest_id).await? {
        Ok(Redirect::to("/").into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, "Interest not found").into_response())
    }
}

pub async fn bookmarks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let papers = state.db.list_bookmarks().await?;
    Ok(HtmlTemplate(BookmarksTemplate { papers }))
}

#[derive(Deserialize)]
pub struct ToggleBookmarkForm {
    #[serde(default)]
    pub entry_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub pdf_link: String,
    #[serde(default)]
    pub published_date: String,
}

pub async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ToggleBookmarkForm>,
) -> Result<Redirect, AppError> {
    if !form.entry_id.is_empty() {
        let draft = BookmarkDraft {
            entry_id: form.entry_id,
            title: form.title,
            summary: form.summary,
            authors: form.authors,
            pdf_link: form.pdf_link,
            published_date: form.published_date,
        };
        state.db.toggle_bookmark(&draft).await?;
    }

    // Send the user back to the page they toggled from
    let target = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/");
    Ok(Redirect::to(target))
}

pub async fn search_form() -> impl IntoResponse {
    HtmlTemplate(SearchTemplate {
        searched: false,
        query: String::new(),
        papers: Vec::new(),
    })
}

#[derive(Deserialize)]
pub struct SearchSubmitForm {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub search_type: String,
}

pub async fn search_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchSubmitForm>,
) -> Result<impl IntoResponse, AppError> {
    let kind = SearchKind::from_type_str(&form.search_type);
    let papers = state
        .arxiv
        .search_or_empty(&form.query, kind, SEARCH_MAX_RESULTS)
        .await;

    let bookmarked = state.db.bookmarked_ids().await?;

    Ok(HtmlTemplate(SearchTemplate {
        searched: true,
        query: form.query,
        papers: annotate(papers, &bookmarked),
    }))
}

pub async fn news(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    render_news(state, 1).await
}

pub async fn news_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    render_news(state, page).await
}

async fn render_news(state: Arc<AppState>, page: usize) -> Result<HtmlTemplate<NewsTemplate>, AppError> {
    let mut articles = state.news.fetch_all().await;
    pipeline::sort_news_by_date(&mut articles);

    let paged = paginate(&articles, page);

    Ok(HtmlTemplate(NewsTemplate {
        articles: paged.items,
        current_page: paged.current_page,
        total_pages: paged.total_pages,
    }))
}
