//! Page detail API consumed by the frontend's `api.fetch.url`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spa_router_core::content::{ContentSource, PartialSource};

use super::ensure_language;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeUser;
use crate::response::PageResponse;
use crate::state::AppState;

/// Query parameters of the page detail API.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Comma-separated partial names. Defaults to the partials of the
    /// page's template.
    pub partials: Option<String>,
}

impl PageQuery {
    fn partial_names(&self) -> Option<Vec<String>> {
        self.partials.as_ref().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// GET /api/{lang}/pages/
pub async fn page_detail_home(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    page_response(&state, &user, &lang, "", &query)
}

/// GET /api/{lang}/pages/{*path}
pub async fn page_detail(
    user: MaybeUser,
    State(state): State<AppState>,
    Path((lang, path)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    page_response(&state, &user, &lang, &path, &query)
}

fn page_response(
    state: &AppState,
    user: &MaybeUser,
    language: &str,
    path: &str,
    query: &PageQuery,
) -> AppResult<Json<PageResponse<serde_json::Value>>> {
    let site = &state.site;
    ensure_language(site, language)?;

    let page = site
        .page_by_path(language, path)
        .filter(|page| !page.login_required || user.is_authenticated())
        .ok_or_else(|| AppError::path_not_found(path))?;

    let data = site.page_data(page, language, user.can_edit_pages())?;

    let names = query
        .partial_names()
        .unwrap_or_else(|| site.settings().partials_for_template(&page.template).to_vec());
    let partials = (!names.is_empty())
        .then(|| site.render_partials(&names, language, user.can_edit_partials()));

    tracing::debug!(page_id = page.id, language, "Serving page detail");

    Ok(Json(PageResponse { data, partials }))
}
