use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::UserRecord;

use crate::state::AppState;

/// GET /api/users — the fixed user list.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<UserRecord>> {
    Json(state.users.all().to_vec())
}
