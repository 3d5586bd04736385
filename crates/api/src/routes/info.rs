use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::AppInfo;

use crate::state::AppState;

/// GET /api/info
pub async fn get(State(state): State<Arc<AppState>>) -> Json<AppInfo> {
    Json(state.info.clone())
}
