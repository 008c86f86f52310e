//! Router views of the news application.

use std::sync::Arc;

use serde_json::{Map, Value};
use spa_router_core::error::CoreError;
use spa_router_core::request::RouteRequest;
use spa_router_core::types::StringMap;
use spa_router_core::urls::UrlPatterns;
use spa_router_core::view::RouterView;

use crate::news::{NewsArchive, NEWS_DETAIL_API, NEWS_LIST_API};

/// URL patterns of the news JSON API.
///
/// Views keep their own copy because they are themselves stored inside the
/// site's [`UrlPatterns`].
pub fn news_api_urls() -> Result<UrlPatterns, CoreError> {
    let mut urls = UrlPatterns::new();
    urls.add(NEWS_LIST_API, "/api/{lang}/news/")?
        .add(NEWS_DETAIL_API, "/api/{lang}/news/{slug}/")?;
    Ok(urls)
}

/// Serves the hooked news page: the list of entries.
pub struct NewsListView {
    archive: Arc<NewsArchive>,
    api_urls: Arc<UrlPatterns>,
    template: Option<String>,
}

impl NewsListView {
    pub fn new(
        archive: Arc<NewsArchive>,
        api_urls: Arc<UrlPatterns>,
        template: Option<String>,
    ) -> Self {
        Self {
            archive,
            api_urls,
            template,
        }
    }
}

impl RouterView for NewsListView {
    fn template_name(&self) -> Option<&str> {
        self.template.as_deref()
    }

    fn fetch_url(&self, language: &str) -> Result<String, CoreError> {
        self.api_urls
            .reverse(NEWS_LIST_API, language, &StringMap::new())
    }

    fn fetched_data(
        &self,
        request: &RouteRequest,
        _kwargs: &StringMap,
    ) -> Result<Map<String, Value>, CoreError> {
        let entries = self.archive.list_data(&self.api_urls, &request.language)?;
        let mut data = Map::new();
        data.insert("entries".into(), Value::Array(entries));
        Ok(data)
    }
}

/// Serves one news entry below the hooked page.
pub struct NewsDetailView {
    archive: Arc<NewsArchive>,
    template: Option<String>,
}

impl NewsDetailView {
    pub fn new(archive: Arc<NewsArchive>, template: Option<String>) -> Self {
        Self { archive, template }
    }
}

impl RouterView for NewsDetailView {
    fn template_name(&self) -> Option<&str> {
        self.template.as_deref()
    }

    fn fetched_data(
        &self,
        _request: &RouteRequest,
        kwargs: &StringMap,
    ) -> Result<Map<String, Value>, CoreError> {
        let slug = kwargs
            .get("slug")
            .ok_or_else(|| CoreError::Configuration("News detail URL without slug".into()))?;
        self.archive.detail_data(slug)
    }

    fn url_params(&self, kwargs: &StringMap) -> StringMap {
        kwargs
            .get("slug")
            .map(|slug| ("slug".to_string(), slug.clone()))
            .into_iter()
            .collect()
    }
}
