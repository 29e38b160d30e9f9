//! Admin authentication extractor.
//!
//! Every dashboard route requires the `ADMIN` role. The decision comes
//! from `octavo_core::access::evaluate` with `Some(Role::Admin)`: no
//! session sends the browser to the admin login (remembering the attempted
//! page); a logged-in non-admin is sent to the public storefront - the
//! dashboard has nothing to show them.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use octavo_core::access::{self, RouteAccess};
use octavo_core::{AuthUser, Role};

use crate::models::SessionAuth;
use crate::state::AppState;

/// The authenticated admin: bearer token plus normalized user.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    /// Bearer token for backend calls on this admin's behalf.
    pub token: String,
    /// Normalized user record; role is always [`Role::Admin`].
    pub user: AuthUser,
}

/// Extractor that requires an authenticated admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.user.username)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when admin access is denied.
pub enum AdminRejection {
    /// Redirect to the admin login page, remembering the attempted page.
    RedirectToLogin { next: String },
    /// Authenticated but not an admin: redirect to the storefront home.
    RedirectToStorefront { home: String },
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                let target = format!("/auth/login?next={}", urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            Self::RedirectToStorefront { home } => Redirect::to(&home).into_response(),
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

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthorized)?;

        let auth_state = SessionAuth::load(session).await;

        match access::evaluate(Some(Role::Admin), &auth_state) {
            RouteAccess::Granted => {}
            RouteAccess::RedirectToLogin => {
                let is_api = parts.uri.path().starts_with("/api/");
                return Err(if is_api {
                    AdminRejection::Unauthorized
                } else {
                    AdminRejection::RedirectToLogin {
                        next: attempted_location(parts),
                    }
                });
            }
            RouteAccess::RedirectToHome => {
                return Err(AdminRejection::RedirectToStorefront {
                    home: app_state.config().storefront_url.clone(),
                });
            }
        }

        // evaluate() only grants when both are present
        let (Some(token), Some(user)) = (auth_state.token, auth_state.user) else {
            return Err(AdminRejection::Unauthorized);
        };

        Ok(Self(CurrentAdmin { token, user }))
    }
}
