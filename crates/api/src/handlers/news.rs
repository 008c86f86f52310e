//! News API: list and detail of news entries.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use super::ensure_language;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/{lang}/news/
pub async fn list_news(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> AppResult<impl IntoResponse> {
    ensure_language(&state.site, &lang)?;
    let entries = state.site.news().list_data(state.site.urls(), &lang)?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/{lang}/news/{slug}/
pub async fn get_news(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    ensure_language(&state.site, &lang)?;
    let entry = state.site.news().detail_data(&slug)?;

    Ok(Json(DataResponse { data: entry }))
}
