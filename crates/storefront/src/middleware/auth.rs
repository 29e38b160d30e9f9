//! Authentication extractors.
//!
//! Route handlers declare their guard by extractor: `RequireAuth` for
//! logged-in-only pages, `OptionalAuth` where the page merely adapts to the
//! viewer. The access decision itself is `octavo_core::access::evaluate`;
//! this module only translates the outcome into HTTP.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use octavo_core::access::{self, RouteAccess};
use octavo_core::{AuthUser, SessionState};

use crate::models::SessionAuth;

/// An authenticated viewer: the bearer token plus the normalized user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Bearer token for backend calls on this user's behalf.
    pub token: String,
    /// Normalized user record.
    pub user: AuthUser,
}

/// Extractor that requires a logged-in user.
///
/// Unauthenticated browsers are redirected to the login page with the
/// attempted location preserved in `?next=`, so login can send them back.
/// API-shaped paths get a bare 401 instead.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(viewer): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", viewer.user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but missing.
pub enum AuthRejection {
    /// Redirect to login, remembering the attempted location.
    RedirectToLogin { next: String },
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                let target = format!("/auth/login?next={}", urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// The attempted location (path plus query) for post-login return.
fn attempted_location(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), ToString::to_string)
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let state = SessionAuth::load(session).await;

        match access::evaluate(None, &state) {
            RouteAccess::Granted => {}
            RouteAccess::RedirectToLogin | RouteAccess::RedirectToHome => {
                let is_api = parts.uri.path().starts_with("/api/");
                return Err(if is_api {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin {
                        next: attempted_location(parts),
                    }
                });
            }
        }

        // evaluate() only grants when both are present
        let (Some(token), Some(user)) = (state.token, state.user) else {
            return Err(AuthRejection::Unauthorized);
        };

        Ok(Self(CurrentUser { token, user }))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(viewer): OptionalAuth,
/// ) -> impl IntoResponse {
///     match viewer {
///         Some(v) => format!("Hello, {}!", v.user.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let viewer = match parts.extensions.get::<Session>() {
            Some(session) => {
                let state = SessionAuth::load(session).await;
                match state {
                    SessionState {
                        token: Some(token),
                        user: Some(user),
                    } => Some(CurrentUser { token, user }),
                    _ => None,
                }
            }
            None => None,
        };

        Ok(Self(viewer))
    }
}
