use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::state::AppState;

// GET /health
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stored_records = state.persistence.stored_user_ids()?.len();

    Ok(Json(serde_json::json!({
        "status": "ok",
        "namespace": state.persistence.namespace(),
        "stored_records": stored_records,
    })))
}
