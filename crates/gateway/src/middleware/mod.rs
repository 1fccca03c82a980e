//! Middleware for bearer token authentication.

mod auth;

pub use auth::{auth_middleware, require_admin, verify_token, Claims, CurrentUser};
