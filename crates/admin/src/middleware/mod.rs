//! HTTP middleware stack for the admin dashboard.

pub mod auth;
pub mod session;

pub use auth::{CurrentAdmin, RequireAdmin};
pub use session::create_session_layer;
