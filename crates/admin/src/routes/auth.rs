//! Admin authentication route handlers.
//!
//! Login goes through the same backend endpoint as the storefront; the
//! difference is what happens after. The session is only established for
//! users whose derived role is `ADMIN` - anyone else is bounced to the
//! public storefront without a dashboard session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::SessionAuth;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Query parameters for error display and post-login return.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Validate a post-login return path (root-relative only).
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        next: query.next,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = match state.backend().login(&form.email, &form.password).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    match SessionAuth::establish(&session, &auth.token, &auth.user).await {
        Ok(Some(user)) if user.is_admin() => {
            tracing::info!(user_id = %user.id, "Admin logged in");
            Redirect::to(safe_next(form.next.as_deref())).into_response()
        }
        Ok(Some(user)) => {
            // Valid account, wrong role: no dashboard session for them.
            tracing::warn!(user_id = %user.id, "Non-admin attempted dashboard login");
            SessionAuth::clear(&session).await;
            Redirect::to(&state.config().storefront_url).into_response()
        }
        Ok(None) => {
            tracing::warn!("Login response carried an unusable user payload");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to persist session: {e}");
            Redirect::to("/auth/login?error=session").into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let snapshot = SessionAuth::load(&session).await;
    if let Some(token) = snapshot.token
        && let Err(e) = state.backend().logout(&token).await
    {
        tracing::warn!("Failed to invalidate token with backend: {e}");
    }

    SessionAuth::clear(&session).await;

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/auth/login").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("/orders")), "/orders");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
