//! Common utilities shared across the catalog services.
//!
//! This crate provides:
//! - Unified error handling for HTTP and gRPC
//! - The `{ ok, message }` action response used at service boundaries
//! - Configuration structures

pub mod action;
pub mod config;
pub mod error;

pub use action::ActionResponse;
pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
