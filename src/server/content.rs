use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use super::{AppState, ApiError};
use crate::cms::Page;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    url: Option<String>,
}

/// `GET /api/page?url=/`: the CMS entry published at `url`.
pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page>, ApiError> {
    let content = state.content.as_ref().ok_or(ApiError::ContentUnavailable)?;
    let url = query.url.as_deref().unwrap_or("/");

    content
        .page(url)
        .await
        .map_err(ApiError::Content)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
