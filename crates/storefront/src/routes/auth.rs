//! Authentication route handlers.
//!
//! Login and registration delegate credential checking to the bookstore
//! API; on success the returned token and (normalized) user are persisted
//! in the session. The `next` parameter carries the location a guard
//! bounced the browser away from, so login can return there.

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

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::models::SessionAuth;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display and post-login return.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate a post-login return path.
///
/// Only root-relative paths are honored; anything else (absolute URLs,
/// protocol-relative `//host` tricks) falls back to the home page so the
/// login flow can't be used as an open redirect.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

/// Re-encode the next path for embedding in a redirect query.
fn login_redirect(error: &str, next: Option<&str>) -> String {
    match next {
        Some(next) if !next.is_empty() => format!(
            "/auth/login?error={error}&next={}",
            urlencoding::encode(next)
        ),
        _ => format!("/auth/login?error={error}"),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
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
    let next = form.next.as_deref();

    match state.backend().login(&form.email, &form.password).await {
        Ok(auth) => {
            match SessionAuth::establish(&session, &auth.token, &auth.user).await {
                Ok(Some(user)) => {
                    set_sentry_user(&user.id, Some(&user.email));
                    tracing::info!(user_id = %user.id, "User logged in");
                    Redirect::to(safe_next(next)).into_response()
                }
                Ok(None) => {
                    // A token without a resolvable user is not a session.
                    tracing::warn!("Login response carried an unusable user payload");
                    Redirect::to(&login_redirect("credentials", next)).into_response()
                }
                Err(e) => {
                    tracing::error!("Failed to persist session: {e}");
                    Redirect::to(&login_redirect("session", next)).into_response()
                }
            }
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to(&login_redirect("credentials", next)).into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// Registration logs the new account straight in: the backend returns the
/// same token/user envelope as login.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    // Validate password length
    if form.password.len() < 8 {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    match state
        .backend()
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(auth) => match SessionAuth::establish(&session, &auth.token, &auth.user).await {
            Ok(Some(user)) => {
                set_sentry_user(&user.id, Some(&user.email));
                tracing::info!(user_id = %user.id, "User registered");
                Redirect::to("/").into_response()
            }
            Ok(None) => {
                tracing::warn!("Registration response carried an unusable user payload");
                Redirect::to("/auth/login?success=registered").into_response()
            }
            Err(e) => {
                tracing::error!("Failed to persist session after registration: {e}");
                Redirect::to("/auth/login?success=registered").into_response()
            }
        },
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            // Check for specific error types
            let error_msg = e.to_string();
            if error_msg.contains("taken") || error_msg.contains("already") {
                Redirect::to("/auth/register?error=email_taken").into_response()
            } else {
                Redirect::to("/auth/register?error=failed").into_response()
            }
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Invalidates the token with the backend (best effort), then clears the
/// persisted auth state and destroys the session.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let state_snapshot = SessionAuth::load(&session).await;
    if let Some(token) = state_snapshot.token
        && let Err(e) = state.backend().logout(&token).await
    {
        tracing::warn!("Failed to invalidate token with backend: {e}");
    }

    SessionAuth::clear(&session).await;

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_relative_paths() {
        assert_eq!(safe_next(Some("/orders")), "/orders");
        assert_eq!(safe_next(Some("/books?page=2")), "/books?page=2");
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_login_redirect_preserves_next() {
        assert_eq!(
            login_redirect("credentials", Some("/cart")),
            "/auth/login?error=credentials&next=%2Fcart"
        );
        assert_eq!(login_redirect("credentials", None), "/auth/login?error=credentials");
    }
}
