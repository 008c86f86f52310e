//! Views that serve router pages, and splicing of their data into the
//! active route.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::request::RouteRequest;
use crate::route::RouterConfig;
use crate::types::StringMap;

/// A view registered in [`UrlPatterns`](crate::urls::UrlPatterns).
///
/// Application views override what they need; the defaults describe a view
/// with no fetch URL, no extra data and no URL params.
pub trait RouterView: Send + Sync {
    /// Served by the CMS page view itself rather than an application.
    fn is_cms_page(&self) -> bool {
        false
    }

    fn template_name(&self) -> Option<&str> {
        None
    }

    /// API URL the frontend fetches this view's data from.
    fn fetch_url(&self, _language: &str) -> Result<String, CoreError> {
        Err(CoreError::Configuration(
            "No fetch URL to get the data. Provide a fetch_url.".into(),
        ))
    }

    /// Data merged into `api.fetched.response.data` of the active route.
    fn fetched_data(
        &self,
        _request: &RouteRequest,
        _kwargs: &StringMap,
    ) -> Result<Map<String, Value>, CoreError> {
        Ok(Map::new())
    }

    /// Params replacing `api.fetched.params` of the active route.
    fn url_params(&self, _kwargs: &StringMap) -> StringMap {
        StringMap::new()
    }
}

/// The view behind every plain CMS page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmsPageView;

impl RouterView for CmsPageView {
    fn is_cms_page(&self) -> bool {
        true
    }
}

/// Put the view's data into the active route of `config`.
///
/// Returns `false` when the tree has no active route; the view's data is
/// not fetched in that case.
pub fn attach_view_data(
    config: &mut RouterConfig,
    view: &dyn RouterView,
    request: &RouteRequest,
    kwargs: &StringMap,
) -> Result<bool, CoreError> {
    let Some(fetched) = config.active_route_mut().and_then(|r| r.fetched_mut()) else {
        return Ok(false);
    };

    let data = view.fetched_data(request, kwargs)?;
    match &mut fetched.response.data {
        Value::Object(existing) => existing.extend(data),
        other => *other = Value::Object(data),
    }

    let params = view.url_params(kwargs);
    if !params.is_empty() {
        fetched.params = params;
    }
    Ok(true)
}
