//! Catalog management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use octavo_core::{BookId, format_currency};

use crate::backend::types::{Book, BookPayload};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Page size for the management table.
const PAGE_SIZE: u32 = 20;

/// Book display data for the management table.
#[derive(Clone)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub stock: i64,
    pub price: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.as_i64(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            stock: book.stock,
            price: format_currency(Some(book.price)),
        }
    }
}

/// Editable book fields for the form template.
#[derive(Clone, Default)]
pub struct BookFormView {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub genre: String,
    pub stock: i64,
    pub price: String,
    pub original_price: String,
}

impl From<&Book> for BookFormView {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id.as_i64()),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            description: book.description.clone(),
            genre: book.genre.clone(),
            stock: book.stock,
            price: book.price.to_string(),
            original_price: book
                .original_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Create/update form data.
#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub stock: i64,
    pub price: String,
    #[serde(default)]
    pub original_price: String,
}

impl BookForm {
    /// Validate the form into a wire payload.
    ///
    /// Prices must parse as decimals here - the storefront's lenient
    /// coercion is for reading the backend, not for accepting typos from
    /// the catalog editor.
    fn into_payload(self) -> Result<BookPayload> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        let price: rust_decimal::Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid price: {}", self.price)))?;

        let original_price = match self.original_price.trim() {
            "" => None,
            raw => Some(
                raw.parse::<rust_decimal::Decimal>()
                    .map_err(|_| AppError::BadRequest(format!("invalid original price: {raw}")))?
                    .to_string(),
            ),
        };

        Ok(BookPayload {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            description: self.description,
            genre: self.genre.trim().to_string(),
            stock: self.stock.max(0),
            price: price.to_string(),
            original_price,
        })
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
}

/// Management table template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksTemplate {
    pub books: Vec<BookRow>,
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: i64,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "books/form.html")]
pub struct BookFormTemplate {
    pub book: BookFormView,
}

/// Display the management table.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .backend()
        .list_books(query.page.unwrap_or(0), PAGE_SIZE)
        .await?;

    Ok(BooksTemplate {
        books: page.content.iter().map(BookRow::from).collect(),
        page: page.number,
        total_pages: page.total_pages,
        total_elements: page.total_elements,
    })
}

/// Display the create form.
#[instrument(skip(_admin))]
pub async fn new(RequireAdmin(_admin): RequireAdmin) -> impl IntoResponse {
    BookFormTemplate {
        book: BookFormView::default(),
    }
}

/// Create a book.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<BookForm>,
) -> Result<impl IntoResponse> {
    let payload = form.into_payload()?;
    let book = state.backend().create_book(&admin.token, &payload).await?;

    tracing::info!(book_id = %book.id, "Book created");
    Ok(Redirect::to("/books"))
}

/// Display the edit form.
#[instrument(skip(state, _admin))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let book = state.backend().get_book(BookId::new(id)).await?;

    Ok(BookFormTemplate {
        book: BookFormView::from(&book),
    })
}

/// Update a book.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> Result<impl IntoResponse> {
    let payload = form.into_payload()?;
    state
        .backend()
        .update_book(&admin.token, BookId::new(id), &payload)
        .await?;

    tracing::info!(book_id = id, "Book updated");
    Ok(Redirect::to("/books"))
}

/// Delete a book.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state
        .backend()
        .delete_book(&admin.token, BookId::new(id))
        .await?;

    tracing::info!(book_id = id, "Book deleted");
    Ok(Redirect::to("/books"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(price: &str, original: &str) -> BookForm {
        BookForm {
            title: "T".into(),
            author: "A".into(),
            isbn: String::new(),
            description: String::new(),
            genre: "Fiction".into(),
            stock: 3,
            price: price.into(),
            original_price: original.into(),
        }
    }

    #[test]
    fn test_form_validates_price() {
        assert!(form("12.99", "").into_payload().is_ok());
        assert!(form("free", "").into_payload().is_err());
    }

    #[test]
    fn test_form_empty_original_price_is_absent() {
        let payload = form("12.99", "  ").into_payload().unwrap();
        assert!(payload.original_price.is_none());

        let payload = form("12.99", "19.99").into_payload().unwrap();
        assert_eq!(payload.original_price.as_deref(), Some("19.99"));
    }

    #[test]
    fn test_form_requires_title() {
        let mut f = form("12.99", "");
        f.title = "  ".into();
        assert!(f.into_payload().is_err());
    }
}
