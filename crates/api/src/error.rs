//! API error types with HTTP response mapping.

use std::any::Any;

use axum::Json;
use axum::body::Body;
use axum::http::{Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use common::AuthError;
use thiserror::Error;
use tower_http::catch_panic::ResponseForPanic;

const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete client input.
    #[error("{0}")]
    BadRequest(String),
    /// Credentials did not match any account.
    #[error("{0}")]
    Unauthorized(String),
    /// No route matched; carries the original request URI.
    #[error("Route {0} not found")]
    NotFound(String),
    /// Unhandled failure. The message has already been filtered through an
    /// [`ErrorPolicy`].
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            ApiError::BadRequest(_) | ApiError::Unauthorized(_) => {
                serde_json::json!({ "success": false, "message": message })
            }
            ApiError::NotFound(_) => {
                serde_json::json!({ "error": "Not Found", "message": message })
            }
            ApiError::Internal(_) => {
                serde_json::json!({ "error": "Internal Server Error", "message": message })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        }
    }
}

/// Decides how much of an unhandled error reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub expose_details: bool,
}

impl ErrorPolicy {
    pub fn new(expose_details: bool) -> Self {
        Self { expose_details }
    }

    /// Logs an unhandled error and turns it into a 500.
    pub fn internal(&self, detail: &str) -> ApiError {
        tracing::error!(error = %detail, "unhandled error");
        let message = if self.expose_details {
            detail.to_string()
        } else {
            GENERIC_INTERNAL_MESSAGE.to_string()
        };
        ApiError::Internal(message)
    }
}

impl ResponseForPanic for ErrorPolicy {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> HttpResponse<Self::ResponseBody> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "handler panicked".to_string()
        };
        self.internal(&detail).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn auth_errors_map_to_400_and_401() {
        let missing: ApiError = AuthError::MissingCredentials.into();
        let response = missing.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "success": false, "message": "Username and password required" })
        );

        let invalid: ApiError = AuthError::InvalidCredentials.into();
        let response = invalid.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn not_found_mentions_route() {
        let response = ApiError::NotFound("/nope?x=1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "Route /nope?x=1 not found");
    }

    #[tokio::test]
    async fn internal_detail_depends_on_policy() {
        let exposed = ErrorPolicy::new(true).internal("database on fire").into_response();
        assert_eq!(exposed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(exposed).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "database on fire");

        let hidden = ErrorPolicy::new(false).internal("database on fire").into_response();
        assert_eq!(body_json(hidden).await["message"], "Something went wrong");
    }

    #[tokio::test]
    async fn panic_payloads_are_rendered() {
        let mut policy = ErrorPolicy::new(true);
        let response = policy.response_for_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "boom");

        let response = policy.response_for_panic(Box::new(String::from("kaboom")));
        assert_eq!(body_json(response).await["message"], "kaboom");
    }
}
