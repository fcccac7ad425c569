use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::{AppState, ApiError, current_session};
use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::history::HistoryEntry;

const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

/// `GET /api/history?limit=N`: the caller's recent requests, newest first.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let claims = current_session(&state, &headers).ok_or(ApiError::Unauthorized)?;
    let Some(history) = &state.history else {
        return Ok(Json(Vec::new()));
    };

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    Ok(Json(history.recent(&claims.email, limit).await?))
}

/// `DELETE /api/history`: forget the caller's requests.
pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    let claims = current_session(&state, &headers).ok_or(ApiError::Unauthorized)?;
    if let Some(history) = &state.history {
        history.clear(&claims.email).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
