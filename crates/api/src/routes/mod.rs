//! HTTP handlers, one module per endpoint group.

pub mod auth;
pub mod health;
pub mod info;
pub mod metrics;
pub mod pages;
pub mod users;

use axum::extract::OriginalUri;

use crate::error::ApiError;

/// Fallback for every request no route (or no method on a route) accepts.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.to_string())
}
