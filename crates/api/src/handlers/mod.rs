pub mod news;
pub mod pages;
pub mod router_view;

use spa_router_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::site::Site;

/// Languages the site is not served in are 404.
fn ensure_language(site: &Site, language: &str) -> AppResult<()> {
    if site.settings().has_language(language) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found("Language", language)))
    }
}
