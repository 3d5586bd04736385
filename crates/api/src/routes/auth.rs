//! Login endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use common::{Account, Credentials};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Placeholder bearer token; nothing validates it.
pub const DEMO_TOKEN: &str = "fake-jwt-token";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: &'static str,
    pub user: Account,
}

/// Login body, accepted as JSON or as a urlencoded form.
///
/// An empty body is read as "no credentials" so that it fails the same way
/// as `{}`.
#[derive(Debug)]
pub struct LoginForm(pub Credentials);

impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(credentials) = Form::<Credentials>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            return Ok(LoginForm(credentials));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(LoginForm(Credentials::default()));
        }
        serde_json::from_slice(&body)
            .map(LoginForm)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

/// POST /api/login — checks the submitted pair against the credential table.
pub async fn login(
    State(state): State<Arc<AppState>>,
    LoginForm(credentials): LoginForm,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .credentials
        .authenticate(&credentials)
        .inspect_err(|err| tracing::info!(reason = %err, "login rejected"))?;

    tracing::info!(username = %user.username, role = %user.role, "login succeeded");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        token: DEMO_TOKEN,
        user,
    }))
}
