//! Canonical roles and role inference from backend payloads.
//!
//! The bookstore API is inconsistent about how it reports a user's role:
//! depending on the endpoint the payload may carry a `role` string, an
//! `authority` string, or `roles`/`authorities` arrays whose elements are
//! either strings or objects wrapping a `role`/`authority` field. All of
//! that is normalized here, at the boundary, into one canonical [`Role`].
//! Nothing outside this module looks at raw role fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::UserId;

/// Canonical access level, serialized as `"USER"` / `"ADMIN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer.
    User,
    /// Store administrator.
    Admin,
}

impl Role {
    /// The wire representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Derive the canonical role from an arbitrary user-shaped payload.
///
/// Collects a pool of candidate strings from `role`/`authority` (plain
/// strings) and `roles`/`authorities` (arrays of strings or of objects
/// carrying a `role`/`authority` field), uppercased, empty entries
/// discarded. Any candidate *containing* `ADMIN` wins over any containing
/// `USER`; anything else resolves to `None`.
///
/// The match is substring-based so `SUPERADMIN` and `ROLE_ADMIN` resolve to
/// [`Role::Admin`]. That also means a hypothetical `USERNAME` authority
/// would resolve to [`Role::User`]; the behavior is kept as-is because the
/// deployed backend relies on the loose match (see the tests).
///
/// Never fails: unrecognized shapes yield `None`, which callers must treat
/// as "no elevated access".
#[must_use]
pub fn infer_role(payload: &Value) -> Option<Role> {
    let obj = payload.as_object()?;

    let mut pool: Vec<String> = Vec::new();

    for key in ["role", "authority"] {
        if let Some(s) = obj.get(key).and_then(Value::as_str)
            && !s.is_empty()
        {
            pool.push(s.to_uppercase());
        }
    }

    for key in ["roles", "authorities"] {
        if let Some(entries) = obj.get(key).and_then(Value::as_array) {
            for entry in entries {
                let candidate = entry.as_str().or_else(|| {
                    entry
                        .get("role")
                        .or_else(|| entry.get("authority"))
                        .and_then(Value::as_str)
                });
                if let Some(s) = candidate
                    && !s.is_empty()
                {
                    pool.push(s.to_uppercase());
                }
            }
        }
    }

    if pool.iter().any(|r| r.contains("ADMIN")) {
        return Some(Role::Admin);
    }
    if pool.iter().any(|r| r.contains("USER")) {
        return Some(Role::User);
    }
    None
}

/// A normalized authenticated user.
///
/// Built from whatever user object the backend returned; `role` is the
/// derived canonical role, not a raw backend field. Role-dependent UI must
/// use this field only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Derived role; `None` when the payload carried nothing resolvable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl AuthUser {
    /// Normalize a user-shaped backend payload.
    ///
    /// Returns `None` when the payload is not an object with a numeric
    /// `id` - in that case the caller must treat the session as
    /// unauthenticated.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let obj = payload.as_object()?;
        let id = obj.get("id").and_then(Value::as_i64)?;
        let username = obj
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let email = obj
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        Some(Self {
            id: UserId::new(id),
            username,
            email,
            role: infer_role(payload),
        })
    }

    /// Whether this user resolved to the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_role_plain_string() {
        assert_eq!(infer_role(&json!({"role": "admin"})), Some(Role::Admin));
        assert_eq!(infer_role(&json!({"role": "USER"})), Some(Role::User));
        assert_eq!(infer_role(&json!({"authority": "ROLE_USER"})), Some(Role::User));
    }

    #[test]
    fn test_infer_role_substring_match() {
        // Substring matching is intentional: prefixed/compound role names
        // from the backend still resolve.
        assert_eq!(infer_role(&json!({"role": "SUPERADMIN"})), Some(Role::Admin));
        assert_eq!(infer_role(&json!({"role": "ROLE_ADMIN"})), Some(Role::Admin));
        // Known loose-match quirk, preserved on purpose.
        assert_eq!(infer_role(&json!({"role": "USERNAME"})), Some(Role::User));
    }

    #[test]
    fn test_infer_role_arrays() {
        assert_eq!(
            infer_role(&json!({"roles": ["reader", "admin"]})),
            Some(Role::Admin)
        );
        assert_eq!(
            infer_role(&json!({"authorities": [{"authority": "ROLE_USER"}]})),
            Some(Role::User)
        );
        assert_eq!(
            infer_role(&json!({"roles": [{"role": "Admin"}]})),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_infer_role_admin_precedence() {
        // ADMIN wins even when a scalar role says user.
        let payload = json!({"role": "user", "roles": ["ADMIN"]});
        assert_eq!(infer_role(&payload), Some(Role::Admin));
    }

    #[test]
    fn test_infer_role_unresolvable() {
        assert_eq!(infer_role(&json!({})), None);
        assert_eq!(infer_role(&json!({"role": ""})), None);
        assert_eq!(infer_role(&json!({"roles": []})), None);
        assert_eq!(infer_role(&json!({"role": "editor"})), None);
        assert_eq!(infer_role(&json!("ADMIN")), None);
        assert_eq!(infer_role(&json!({"roles": [42, null]})), None);
    }

    #[test]
    fn test_infer_role_idempotent() {
        // Running inference over an already-normalized user changes nothing.
        let payload = json!({
            "id": 7,
            "username": "casey",
            "email": "casey@example.com",
            "roles": [{"authority": "ROLE_ADMIN"}],
        });
        let user = AuthUser::from_payload(&payload).unwrap();
        let normalized = serde_json::to_value(&user).unwrap();
        assert_eq!(infer_role(&normalized), infer_role(&payload));
    }

    #[test]
    fn test_from_payload_normalizes() {
        let payload = json!({
            "id": 3,
            "username": "robin",
            "email": "robin@example.com",
            "role": "user",
        });
        let user = AuthUser::from_payload(&payload).unwrap();
        assert_eq!(user.id, UserId::new(3));
        assert_eq!(user.role, Some(Role::User));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_from_payload_missing_id() {
        assert!(AuthUser::from_payload(&json!({"username": "x"})).is_none());
        assert!(AuthUser::from_payload(&json!(null)).is_none());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "USER");
        assert!("admin".parse::<Role>().is_err());
    }
}
