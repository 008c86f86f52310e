use axum::routing::get;
use axum::Router;

use crate::handlers::news;
use crate::state::AppState;

/// News API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{lang}/news/", get(news::list_news))
        .route("/api/{lang}/news/{slug}/", get(news::get_news))
}
