use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, extract::ClientIdentifier, state::AppState};

/// `POST /api/visitors`: record the caller as today's visitor.
///
/// No body. Tracking runs in a detached task, so the response is always
/// `200 {"success": true}` whatever the store does.
#[tracing::instrument(skip(state))]
pub async fn track_visit(
    State(state): State<Arc<AppState>>,
    identifier: ClientIdentifier,
) -> impl IntoResponse {
    state.record_visit(identifier.0);
    Json(json!({ "success": true }))
}

/// `GET /api/visitors/count`: distinct visitors for the current UTC+9 day.
///
/// Response: `{ "count": 42 }`. A store failure is a `500`.
#[tracing::instrument(skip(state))]
pub async fn visitor_count(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.counter.count().await?;
    Ok(Json(json!({ "count": count })))
}
