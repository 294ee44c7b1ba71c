//! Shared types for the Misky backend
//!
//! Error codes, error types and the unified API response envelope used by
//! the server crate and (as JSON) by the frontend clients.

pub mod error;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
