//! User management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use octavo_core::{Role, UserId, infer_role};

use crate::backend::types::UserAccount;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// User display data for the management table.
#[derive(Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Raw role string as the backend reports it.
    pub role: String,
    /// Derived canonical role, for the elevated-access marker.
    pub is_admin: bool,
}

impl From<&UserAccount> for UserRow {
    fn from(user: &UserAccount) -> Self {
        let derived = infer_role(
            &serde_json::to_value(user).unwrap_or(serde_json::Value::Null),
        );
        Self {
            id: user.id.as_i64(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone().unwrap_or_else(|| "-".to_string()),
            is_admin: derived == Some(Role::Admin),
        }
    }
}

/// Role update form data.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

/// User management page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub users: Vec<UserRow>,
    pub current_admin_id: i64,
}

/// Display the user table.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let users = state.backend().list_users(&admin.token).await?;

    Ok(UsersTemplate {
        users: users.iter().map(UserRow::from).collect(),
        current_admin_id: admin.user.id.as_i64(),
    })
}

/// Change a user's role.
#[instrument(skip(state, admin))]
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Result<impl IntoResponse> {
    // Only the two canonical roles are assignable from the dashboard.
    let role: Role = form
        .role
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    state
        .backend()
        .update_user_role(&admin.token, UserId::new(id), role.as_str())
        .await?;

    tracing::info!(user_id = id, role = %role, "User role updated");
    Ok(Redirect::to("/users"))
}

/// Delete a user account.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    if admin.user.id.as_i64() == id {
        return Err(AppError::BadRequest(
            "you can't delete your own account".to_string(),
        ));
    }

    state
        .backend()
        .delete_user(&admin.token, UserId::new(id))
        .await?;

    tracing::info!(user_id = id, "User deleted");
    Ok(Redirect::to("/users"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_row_derives_admin_marker() {
        let user: UserAccount = serde_json::from_value(json!({
            "id": 1, "username": "root", "email": "root@x.com", "role": "ROLE_ADMIN",
        }))
        .unwrap();
        let row = UserRow::from(&user);
        assert!(row.is_admin);
        assert_eq!(row.role, "ROLE_ADMIN");
    }

    #[test]
    fn test_user_row_without_role() {
        let user: UserAccount = serde_json::from_value(json!({
            "id": 2, "username": "guest", "email": "g@x.com",
        }))
        .unwrap();
        let row = UserRow::from(&user);
        assert!(!row.is_admin);
        assert_eq!(row.role, "-");
    }
}
