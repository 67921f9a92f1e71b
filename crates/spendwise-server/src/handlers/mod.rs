//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod budgets;
pub mod data;
pub mod expenses;
pub mod income;
pub mod notifications;

// Re-export all handlers for use in router
pub use analytics::*;
pub use audit::*;
pub use auth::*;
pub use budgets::*;
pub use data::*;
pub use expenses::*;
pub use income::*;
pub use notifications::*;

use serde::de::DeserializeOwned;

use crate::AppError;

/// Decode a JSON request body, reporting malformed input as a 400
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(&format!("Invalid request body: {}", e)))
}
