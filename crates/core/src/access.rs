//! Route-access policy.
//!
//! The guard decision is pure: given the session state and an optional
//! required role, decide whether to render, bounce to login, or bounce to
//! the home page. The web crates translate the decision into redirects;
//! nothing here knows about HTTP.

use serde::{Deserialize, Serialize};

use crate::types::{AuthUser, Role};

/// Authentication state read from the durable session store.
///
/// Invariant: a session is only considered authenticated when *both* the
/// token and a resolvable user are present. A token on its own (the user
/// record failed to load or parse) is treated as unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer token for the bookstore API.
    pub token: Option<String>,
    /// Normalized user record.
    pub user: Option<AuthUser>,
}

impl SessionState {
    /// The logged-out state.
    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// Whether both a token and a user are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Outcome of evaluating a guarded route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Render the protected content.
    Granted,
    /// Not authenticated: send to login, remembering the attempted path.
    RedirectToLogin,
    /// Authenticated but lacking the required role: send to the home page.
    RedirectToHome,
}

/// Evaluate access to a route that may require a specific role.
///
/// The role comparison is exact enum equality - stricter than role
/// inference itself, which happens once at the session boundary.
#[must_use]
pub fn evaluate(required: Option<Role>, session: &SessionState) -> RouteAccess {
    let (Some(_token), Some(user)) = (&session.token, &session.user) else {
        return RouteAccess::RedirectToLogin;
    };

    match required {
        Some(role) if user.role != Some(role) => RouteAccess::RedirectToHome,
        _ => RouteAccess::Granted,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn user_with(role: Option<Role>) -> AuthUser {
        AuthUser {
            id: UserId::new(1),
            username: "sam".to_owned(),
            email: "sam@example.com".to_owned(),
            role,
        }
    }

    fn session(token: Option<&str>, user: Option<AuthUser>) -> SessionState {
        SessionState {
            token: token.map(str::to_owned),
            user,
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let anon = SessionState::unauthenticated();
        assert_eq!(evaluate(None, &anon), RouteAccess::RedirectToLogin);
        assert_eq!(
            evaluate(Some(Role::Admin), &anon),
            RouteAccess::RedirectToLogin
        );
    }

    #[test]
    fn test_token_without_user_is_unauthenticated() {
        let s = session(Some("tok"), None);
        assert_eq!(evaluate(None, &s), RouteAccess::RedirectToLogin);
        assert!(!s.is_authenticated());
    }

    #[test]
    fn test_user_without_token_is_unauthenticated() {
        let s = session(None, Some(user_with(Some(Role::Admin))));
        assert_eq!(evaluate(Some(Role::Admin), &s), RouteAccess::RedirectToLogin);
    }

    #[test]
    fn test_user_blocked_from_admin_route() {
        let s = session(Some("tok"), Some(user_with(Some(Role::User))));
        assert_eq!(evaluate(Some(Role::Admin), &s), RouteAccess::RedirectToHome);
    }

    #[test]
    fn test_unresolved_role_blocked_from_role_gated_route() {
        let s = session(Some("tok"), Some(user_with(None)));
        assert_eq!(evaluate(Some(Role::User), &s), RouteAccess::RedirectToHome);
    }

    #[test]
    fn test_admin_granted_admin_route() {
        let s = session(Some("tok"), Some(user_with(Some(Role::Admin))));
        assert_eq!(evaluate(Some(Role::Admin), &s), RouteAccess::Granted);
    }

    #[test]
    fn test_no_required_role_grants_any_authenticated_user() {
        let s = session(Some("tok"), Some(user_with(None)));
        assert_eq!(evaluate(None, &s), RouteAccess::Granted);
    }
}
