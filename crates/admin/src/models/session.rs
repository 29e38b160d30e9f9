//! Session-persisted authentication state for the admin dashboard.
//!
//! Same layout as the storefront's sessions: the bearer token under
//! `"token"`, the normalized user under `"user"`, written together,
//! removed together, and cleared entirely when the user value fails to
//! parse.

use serde_json::Value;
use tower_sessions::Session;

use octavo_core::{AuthUser, SessionState};

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for the bookstore API bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the normalized user record (JSON).
    pub const USER: &str = "user";
}

/// Reads and writes the authentication state in the session store.
pub struct SessionAuth;

impl SessionAuth {
    /// Establish a logged-in session from a backend auth response.
    ///
    /// Returns the normalized user, or `None` when the payload was not
    /// user-shaped (nothing is persisted in that case).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn establish(
        session: &Session,
        token: &str,
        user_payload: &Value,
    ) -> Result<Option<AuthUser>, tower_sessions::session::Error> {
        let Some(user) = AuthUser::from_payload(user_payload) else {
            return Ok(None);
        };

        session.insert(session_keys::TOKEN, token).await?;
        session.insert(session_keys::USER, &user).await?;

        Ok(Some(user))
    }

    /// Rehydrate the auth state from the session store, failing closed on
    /// a corrupt user record.
    pub async fn load(session: &Session) -> SessionState {
        let token = session
            .get::<String>(session_keys::TOKEN)
            .await
            .ok()
            .flatten();

        let stored_user = session
            .get::<Value>(session_keys::USER)
            .await
            .ok()
            .flatten();

        let user = match stored_user {
            Some(value) => {
                let parsed = AuthUser::from_payload(&value);
                if parsed.is_none() {
                    tracing::warn!("Persisted user record is corrupt, clearing auth state");
                    Self::clear(session).await;
                    return SessionState::unauthenticated();
                }
                parsed
            }
            None => None,
        };

        SessionState { token, user }
    }

    /// Clear the persisted auth state (logout).
    pub async fn clear(session: &Session) {
        if let Err(e) = session.remove::<String>(session_keys::TOKEN).await {
            tracing::error!("Failed to remove session token: {e}");
        }
        if let Err(e) = session.remove::<Value>(session_keys::USER).await {
            tracing::error!("Failed to remove session user: {e}");
        }
    }
}
