pub mod health;
pub mod news;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the JSON API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /api/{lang}/pages/                  home page detail
/// /api/{lang}/pages/{*path}           page detail
/// /api/{lang}/news/                   news list
/// /api/{lang}/news/{slug}/            news detail
/// ```
///
/// Every other GET path is answered by the router view fallback.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(pages::router()).merge(news::router())
}
