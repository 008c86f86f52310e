//! The router view: every public page URL answers with the frontend route
//! tree of that request, the active route already carrying its data.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Uri};
use axum::response::{IntoResponse, Response};
use spa_router_core::builder::RouteTreeBuilder;
use spa_router_core::content::MenuProvider;
use spa_router_core::request::RouteRequest;
use spa_router_core::route::RouterConfig;
use spa_router_core::view::attach_view_data;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeUser;
use crate::site::Site;
use crate::state::AppState;

/// Response header reporting whether the body came from the cache.
pub const CACHE_HEADER: &str = "x-cache";

/// GET fallback for every path not served by an API route.
///
/// Anonymous responses are cached per path; authenticated ones depend on
/// permissions and are always rendered.
pub async fn router_view(
    State(state): State<AppState>,
    user: MaybeUser,
    uri: Uri,
) -> AppResult<Response> {
    let path = uri.path();
    let cacheable = !user.is_authenticated();

    if cacheable {
        if let Some(body) = state.cache.get(path).await {
            tracing::debug!(path, "Router response served from cache");
            return Ok(json_response(body, "hit"));
        }
    }

    let body = render_routes(&state.site, &user, path)?;

    if cacheable {
        state.cache.insert(path, body.clone()).await;
    }
    Ok(json_response(body, "miss"))
}

/// Serialized `{"routes": [...]}` of `path`.
pub fn render_routes(site: &Site, user: &MaybeUser, path: &str) -> AppResult<String> {
    let resolved = site
        .urls()
        .resolve(path)
        .ok_or_else(|| AppError::path_not_found(path))?;
    let view = resolved
        .view
        .clone()
        .ok_or_else(|| AppError::path_not_found(path))?;

    let language = resolved
        .language()
        .unwrap_or_else(|| site.settings().default_language())
        .to_string();
    if !site.settings().has_language(&language) {
        return Err(AppError::path_not_found(path));
    }

    if view.is_cms_page() {
        let page_path = resolved.kwargs.get("path").map_or("", String::as_str);
        let visible = site
            .page_by_path(&language, page_path)
            .is_some_and(|page| !page.login_required || user.is_authenticated());
        if !visible {
            return Err(AppError::path_not_found(path));
        }
    }

    let request = RouteRequest {
        path: path.to_string(),
        language,
        authenticated: user.is_authenticated(),
        can_edit_pages: user.can_edit_pages(),
        can_edit_partials: user.can_edit_partials(),
    };

    let tree = site.menu(&request)?;
    let builder = RouteTreeBuilder::new(site.settings(), site.urls(), site, site);
    let mut config = RouterConfig {
        routes: builder.build(&tree, &request)?,
    };

    if !attach_view_data(&mut config, view.as_ref(), &request, &resolved.kwargs)? {
        tracing::debug!(path, route = %resolved.name, "No active route for request");
    }

    tracing::debug!(path, routes = config.routes.len(), "Route tree built");
    Ok(serde_json::to_string(&config)?)
}

fn json_response(body: String, cache_status: &'static str) -> Response {
    (
        [
            (CONTENT_TYPE, "application/json"),
            (HeaderName::from_static(CACHE_HEADER), cache_status),
        ],
        body,
    )
        .into_response()
}
