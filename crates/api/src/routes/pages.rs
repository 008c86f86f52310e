use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Page detail API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{lang}/pages/", get(pages::page_detail_home))
        .route("/api/{lang}/pages/{*path}", get(pages::page_detail))
}
