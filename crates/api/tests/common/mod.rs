#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use spa_router_api::auth::jwt::{generate_access_token, JwtConfig};
use spa_router_api::cache::ResponseCache;
use spa_router_api::config::ServerConfig;
use spa_router_api::router::build_app_router;
use spa_router_api::site::Site;
use spa_router_api::state::AppState;

/// The site every integration test runs against.
pub const SITE_FIXTURE: &str = include_str!("../fixtures/site.json");

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cache_timeout_secs: 300,
        site_file: "tests/fixtures/site.json".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over the fixture site.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app() -> Router {
    build_test_app_with_cache(Arc::new(ResponseCache::new(300)))
}

/// Like [`build_test_app`], sharing `cache` so tests can inspect it.
pub fn build_test_app_with_cache(cache: Arc<ResponseCache>) -> Router {
    let config = test_config();
    let site = Site::from_json(SITE_FIXTURE).expect("fixture site must load");

    let state = AppState {
        config: Arc::new(config.clone()),
        site: Arc::new(site),
        cache,
    };

    build_app_router(state, &config)
}

/// Access token for user 1 granting `perms`.
pub fn token(perms: &[&str]) -> String {
    generate_access_token(1, perms, &test_config().jwt).expect("token generation")
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with `Authorization: Bearer <token>`.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
