//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use octavo_core::{BookId, PageItem, format_currency, next_page, page_window, previous_page};

use crate::backend::types::{Book, PageResponse};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Default page size for listings.
const PAGE_SIZE: u32 = 12;

/// Book display data for templates.
#[derive(Clone)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub price: String,
    pub original_price: Option<String>,
    pub discount_percentage: Option<u32>,
    pub image: Option<String>,
    pub in_stock: bool,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.as_i64(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            description: book.description.clone(),
            price: format_currency(Some(book.price)),
            original_price: book
                .discount_percentage()
                .and(book.original_price)
                .map(|p| format_currency(Some(p))),
            discount_percentage: book.discount_percentage(),
            image: book.image.clone(),
            in_stock: book.in_stock(),
        }
    }
}

// =============================================================================
// Pagination View
// =============================================================================

/// One slot in the rendered pagination control.
#[derive(Clone)]
pub struct PageLink {
    /// Display label (1-based page number, or an ellipsis).
    pub label: String,
    /// Href for navigable slots; `None` renders as a gap.
    pub href: Option<String>,
    pub current: bool,
}

/// Pagination control data for templates.
#[derive(Clone)]
pub struct PagerView {
    pub links: Vec<PageLink>,
    /// Previous-page href; `None` at the first page (control disabled).
    pub prev: Option<String>,
    /// Next-page href; `None` at the last page (control disabled).
    pub next: Option<String>,
}

impl PagerView {
    /// Build the bounded pagination control for a listing page.
    #[must_use]
    pub fn build(current: u32, total: u32, category: Option<&str>) -> Self {
        let href = |page: u32| -> String {
            category.map_or_else(
                || format!("/books?page={page}"),
                |cat| format!("/books?page={page}&category={}", urlencoding::encode(cat)),
            )
        };

        let links = page_window(current, total)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) => PageLink {
                    label: (page + 1).to_string(),
                    href: Some(href(page)),
                    current: page == current,
                },
                PageItem::Ellipsis => PageLink {
                    label: "...".to_string(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        // Previous/next clamp at the edges; a clamped control renders
        // disabled instead of linking to the same page.
        let prev = (previous_page(current) != current).then(|| href(previous_page(current)));
        let next = (next_page(current, total) != current).then(|| href(next_page(current, total)));

        Self { links, prev, next }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub category: Option<String>,
}

/// Book listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksIndexTemplate {
    pub books: Vec<BookView>,
    pub categories: Vec<String>,
    pub current_category: Option<String>,
    pub pager: PagerView,
    pub total_elements: i64,
    pub logged_in: bool,
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookShowTemplate {
    pub book: BookView,
    pub logged_in: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the book listing, optionally filtered to one category.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let current_page = query.page.unwrap_or(0);

    let page: PageResponse<Book> = match query.category.as_deref() {
        Some(category) => {
            state
                .backend()
                .books_by_category(category, current_page, PAGE_SIZE)
                .await?
        }
        None => state.backend().list_books(current_page, PAGE_SIZE).await?,
    };

    let categories = state.backend().categories().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch categories: {e}");
        Vec::new()
    });

    let pager = PagerView::build(page.number, page.total_pages, query.category.as_deref());

    Ok(BooksIndexTemplate {
        books: page.content.iter().map(BookView::from).collect(),
        categories,
        current_category: query.category,
        pager,
        total_elements: page.total_elements,
        logged_in: viewer.is_some(),
    })
}

/// Display a book detail page.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let book = state.backend().get_book(BookId::new(id)).await?;

    Ok(BookShowTemplate {
        book: BookView::from(&book),
        logged_in: viewer.is_some(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_middle_page() {
        let pager = PagerView::build(5, 10, None);
        let labels: Vec<&str> = pager.links.iter().map(|l| l.label.as_str()).collect();
        // 1-based labels over the {0, ..., 4 5 6, ..., 9} window
        assert_eq!(labels, vec!["1", "...", "5", "6", "7", "...", "10"]);
        assert!(pager.links.iter().any(|l| l.current && l.label == "6"));
        assert!(pager.prev.is_some());
        assert!(pager.next.is_some());
    }

    #[test]
    fn test_pager_boundaries_disable_navigation() {
        let first = PagerView::build(0, 10, None);
        assert!(first.prev.is_none());
        assert_eq!(first.next.as_deref(), Some("/books?page=1"));

        let last = PagerView::build(9, 10, None);
        assert!(last.next.is_none());
        assert_eq!(last.prev.as_deref(), Some("/books?page=8"));
    }

    #[test]
    fn test_pager_preserves_category() {
        let pager = PagerView::build(1, 3, Some("science fiction"));
        assert_eq!(
            pager.next.as_deref(),
            Some("/books?page=2&category=science%20fiction")
        );
    }
}
