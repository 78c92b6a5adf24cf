use std::collections::HashSet;

use crate::arxiv::{ArxivClient, PaperRecord, SearchKind};
use crate::db::Database;
use crate::news::NewsArticle;

pub const PAGE_SIZE: usize = 10;

/// One page of a sorted sequence, 1-based.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
}

/// The merged paper view for all stored interests, plus the entry ids the
/// caller needs to annotate each record's bookmark state.
pub struct MergedFeed {
    pub papers: Vec<PaperRecord>,
    pub bookmarked: HashSet<String>,
}

/// Run one arXiv search per stored interest and merge the results:
/// concatenate in interest order, drop duplicate entry ids keeping the
/// first occurrence, then sort newest first. A failing search contributes
/// an empty list and the aggregation carries on.
pub async fn aggregate_papers(db: &Database, arxiv: &ArxivClient) -> anyhow::Result<MergedFeed> {
    let interests = db.list_interests().await?;

    let mut all_papers = Vec::new();
    for interest in &interests {
        let kind = SearchKind::from_type_str(&interest.interest_type);
        let papers = arxiv
            .search_or_empty(&interest.keyword, kind, arxiv.max_results())
            .await;
        all_papers.extend(papers);
    }

    let mut papers = dedup_papers(all_papers);
    sort_by_date_desc(&mut papers, |p| &p.published_date);

    let bookmarked = db.bookmarked_ids().await?;

    Ok(MergedFeed { papers, bookmarked })
}

/// Keep the first occurrence of each entry_id, in input order. Later
/// duplicates are dropped even when they came from a different interest.
pub fn dedup_papers(papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen_ids = HashSet::new();
    let mut unique = Vec::with_capacity(papers.len());

    for paper in papers {
        if seen_ids.insert(paper.entry_id.clone()) {
            unique.push(paper);
        }
    }

    unique
}

/// Sort newest first by the date string itself. Dates are kept in sortable
/// forms (papers: YYYY-MM-DD), so no date parsing happens at sort time.
pub fn sort_by_date_desc<T, F>(items: &mut [T], date_key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| date_key(b).cmp(date_key(a)));
}

pub fn sort_news_by_date(articles: &mut [NewsArticle]) {
    sort_by_date_desc(articles, |a| &a.published_date);
}

/// Slice out the requested 1-based page. Out-of-range pages yield an empty
/// items list, not an error; total_pages is 0 for an empty input.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let page = page.max(1);
    let total_pages = items.len().div_ceil(PAGE_SIZE);

    let start = (page - 1).saturating_mul(PAGE_SIZE);
    let page_items = if start >= items.len() {
        Vec::new()
    } else {
        let end = (start + PAGE_SIZE).min(items.len());
        items[start..end].to_vec()
    };

    Page {
        items: page_items,
        current_page: page,
        total_pages,
    }
}
