//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::books::BookView;
use crate::state::AppState;

/// Number of featured books on the home page.
const FEATURED_COUNT: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<BookView>,
    pub categories: Vec<String>,
    pub logged_in: bool,
    pub username: Option<String>,
}

/// Display the home page: featured books plus category navigation.
#[instrument(skip(state, viewer))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
) -> Result<impl IntoResponse> {
    let page = state.backend().list_books(0, FEATURED_COUNT).await?;

    let categories = state.backend().categories().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch categories: {e}");
        Vec::new()
    });

    Ok(HomeTemplate {
        featured: page.content.iter().map(BookView::from).collect(),
        categories,
        username: viewer.as_ref().map(|v| v.user.username.clone()),
        logged_in: viewer.is_some(),
    })
}
