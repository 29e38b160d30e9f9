//! Core types for Octavo Books.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod role;
pub mod status;

pub use id::*;
pub use role::{AuthUser, Role, infer_role};
pub use status::OrderStatus;
