//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::HealthStatus;

use crate::state::AppState;

/// GET /api/health — uptime and build snapshot. Always succeeds.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let status = HealthStatus::new(
        state.metrics.uptime(),
        chrono::Utc::now(),
        state.info.version.as_str(),
        state.environment.as_str(),
    );
    tracing::info!(
        uptime = status.uptime,
        version = %status.version,
        environment = %status.environment,
        "health check requested"
    );
    Json(status)
}
