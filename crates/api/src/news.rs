//! News application: entries, their routing and their JSON representation.
//!
//! The news app is hooked into a CMS page. Its list view lives at the hooked
//! page's URL and every entry gets a detail URL one segment below it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use spa_router_core::app_model::{
    AppModelRouting, RouteGroups, RouteParameter, ViewParameters, ViewRoutes,
};
use spa_router_core::error::CoreError;
use spa_router_core::types::{StringMap, Timestamp};
use spa_router_core::urls::UrlPatterns;

/// Application name pages use in `application_urls` to hook the news app.
pub const NEWS_APP: &str = "news";

pub const NEWS_LIST_API: &str = "news_list_api";
pub const NEWS_DETAIL_API: &str = "news_detail_api";
pub const NEWS_LIST: &str = "news_list";
pub const NEWS_DETAIL: &str = "news_detail";

/// One news entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub lead: String,
    #[serde(default)]
    pub body: String,
    pub published_at: Timestamp,
}

impl NewsEntry {
    /// Attribute values used to build URLs of this entry.
    pub fn url_values(&self) -> StringMap {
        [("slug".to_string(), self.slug.clone())].into_iter().collect()
    }
}

/// Routing of news entries in the frontend router.
pub fn news_routing() -> AppModelRouting {
    AppModelRouting {
        router_name: "news-detail".into(),
        router_component: "NewsDetail".into(),
        route_patterns: [("slug".to_string(), ":slug".to_string())]
            .into_iter()
            .collect(),
        routes: RouteGroups {
            api: ViewRoutes {
                list: NEWS_LIST_API.into(),
                detail: NEWS_DETAIL_API.into(),
            },
            normal: ViewRoutes {
                list: NEWS_LIST.into(),
                detail: NEWS_DETAIL.into(),
            },
        },
        route_parameters: ViewParameters {
            list: Vec::new(),
            detail: vec![RouteParameter::same("slug")],
        },
    }
}

/// All news entries, newest first.
#[derive(Debug, Clone)]
pub struct NewsArchive {
    entries: Vec<NewsEntry>,
    routing: AppModelRouting,
}

impl NewsArchive {
    pub fn new(mut entries: Vec<NewsEntry>) -> Self {
        entries.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self {
            entries,
            routing: news_routing(),
        }
    }

    pub fn entries(&self) -> &[NewsEntry] {
        &self.entries
    }

    pub fn routing(&self) -> &AppModelRouting {
        &self.routing
    }

    pub fn find(&self, slug: &str) -> Result<&NewsEntry, CoreError> {
        self.entries
            .iter()
            .find(|e| e.slug == slug)
            .ok_or_else(|| CoreError::not_found("NewsEntry", slug))
    }

    /// List representation: summaries with a link to each detail route.
    pub fn list_data(&self, urls: &UrlPatterns, language: &str) -> Result<Vec<Value>, CoreError> {
        self.entries
            .iter()
            .map(|entry| {
                let link = self.routing.link(urls, language, &entry.url_values())?;
                Ok(json!({
                    "slug": entry.slug,
                    "title": entry.title,
                    "lead": entry.lead,
                    "published_at": entry.published_at,
                    "link": link,
                }))
            })
            .collect()
    }

    /// Detail representation of the entry `slug`.
    pub fn detail_data(&self, slug: &str) -> Result<Map<String, Value>, CoreError> {
        let entry = self.find(slug)?;
        match serde_json::to_value(entry) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Internal("News entry is not an object".into())),
            Err(err) => Err(CoreError::Internal(format!("Serialization failed: {err}"))),
        }
    }
}
