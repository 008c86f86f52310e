use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::config::ServerConfig;
use crate::site::Site;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Content site: pages, partials, app models and URL patterns.
    pub site: Arc<Site>,
    /// Rendered router responses of anonymous requests, keyed by path.
    pub cache: Arc<ResponseCache>,
}
