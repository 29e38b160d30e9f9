//! Session-persisted authentication state.
//!
//! Two fixed keys in the durable session store carry the whole auth state:
//! the bearer token under `"token"` and the normalized user record under
//! `"user"` (JSON). Both are written on login, both are removed on logout,
//! and a corrupt user value clears everything - a half-session must never
//! resurrect as an authenticated one.

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
    /// Normalizes the raw user payload (deriving the canonical role) and
    /// persists token and user together. Returns the normalized user, or
    /// `None` when the payload was not user-shaped - in that case nothing
    /// is persisted and the caller should treat the login as failed.
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

    /// Rehydrate the auth state from the session store.
    ///
    /// Fails closed: when the stored user value exists but no longer
    /// parses into a user, both keys are cleared and the unauthenticated
    /// state is returned.
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
                // Re-derive the role on every load so the stored record and
                // a freshly normalized one always agree.
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
    ///
    /// Removal failures are logged, not propagated: the caller is tearing
    /// the session down either way.
    pub async fn clear(session: &Session) {
        if let Err(e) = session.remove::<String>(session_keys::TOKEN).await {
            tracing::error!("Failed to remove session token: {e}");
        }
        if let Err(e) = session.remove::<Value>(session_keys::USER).await {
            tracing::error!("Failed to remove session user: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tower_sessions::MemoryStore;

    use octavo_core::Role;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_establish_then_load_round_trips() {
        let session = session();
        let payload = json!({
            "id": 1,
            "username": "sam",
            "email": "sam@example.com",
            "roles": ["ROLE_ADMIN"],
        });

        let user = SessionAuth::establish(&session, "tok-1", &payload)
            .await
            .unwrap()
            .unwrap();
        assert!(user.is_admin());

        let state = SessionAuth::load(&session).await;
        assert!(state.is_authenticated());
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(state.user.unwrap().role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_logout_then_load_is_unauthenticated() {
        let session = session();
        let payload = json!({
            "id": 2,
            "username": "kit",
            "email": "kit@example.com",
            "role": "user",
        });
        SessionAuth::establish(&session, "tok-2", &payload)
            .await
            .unwrap();

        SessionAuth::clear(&session).await;

        // No resurrection of cleared state.
        let state = SessionAuth::load(&session).await;
        assert_eq!(state, SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_corrupt_user_record_fails_closed() {
        let session = session();
        session.insert(session_keys::TOKEN, "tok-3").await.unwrap();
        // Not user-shaped: no id.
        session
            .insert(session_keys::USER, json!({"username": "no-id"}))
            .await
            .unwrap();

        let state = SessionAuth::load(&session).await;
        assert_eq!(state, SessionState::unauthenticated());

        // The token must not survive on its own.
        let token: Option<String> = session.get(session_keys::TOKEN).await.unwrap();
        assert_eq!(token, None);
    }

    #[tokio::test]
    async fn test_non_user_payload_establishes_nothing() {
        let session = session();
        let result = SessionAuth::establish(&session, "tok-4", &json!("not an object"))
            .await
            .unwrap();
        assert!(result.is_none());

        let state = SessionAuth::load(&session).await;
        assert!(!state.is_authenticated());
    }
}
