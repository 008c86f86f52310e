//! JWT-based authentication extractor for Axum handlers.
//!
//! Router and content endpoints are public; a valid token only unlocks
//! `login_required` pages and editable content, and bypasses the response
//! cache.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spa_router_core::error::CoreError;

use crate::auth::jwt::{validate_token, PERM_CHANGE_PAGE, PERM_EDIT_STATIC_PLACEHOLDER};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: i64,
    /// Granted permissions.
    pub perms: Vec<String>,
}

impl AuthUser {
    pub fn has_perm(&self, perm: &str) -> bool {
        self.perms.iter().any(|p| p == perm)
    }

    pub fn can_edit_pages(&self) -> bool {
        self.has_perm(PERM_CHANGE_PAGE)
    }

    pub fn can_edit_partials(&self) -> bool {
        self.has_perm(PERM_EDIT_STATIC_PLACEHOLDER)
    }
}

/// The authenticated user, or `None` for anonymous visitors.
///
/// A missing `Authorization` header is anonymous; a present but malformed
/// or invalid token is rejected with 401.
///
/// ```ignore
/// async fn my_handler(MaybeUser(user): MaybeUser) -> AppResult<Json<()>> {
///     tracing::info!(authenticated = user.is_some(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn can_edit_pages(&self) -> bool {
        self.0.as_ref().is_some_and(AuthUser::can_edit_pages)
    }

    pub fn can_edit_partials(&self) -> bool {
        self.0.as_ref().is_some_and(AuthUser::can_edit_partials)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get("authorization") else {
            return Ok(MaybeUser(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(MaybeUser(Some(AuthUser {
            user_id: claims.sub,
            perms: claims.perms,
        })))
    }
}
