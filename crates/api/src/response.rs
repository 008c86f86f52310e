//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Page detail envelope: `{ "data": T, "partials": {...} }`.
///
/// `partials` is only present when the client asked for some.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partials: Option<serde_json::Map<String, serde_json::Value>>,
}
