//! Route descriptors: the frontend router configuration emitted per request.
//!
//! Wire format of one descriptor:
//!
//! ```text
//! {
//!   "path": "/en/news/",
//!   "name": "cms-page-4",
//!   "component": "news-list",
//!   "api": {
//!     "fetch": {"url": "/api/en/pages/news/", "cache": true, "query": {"partials": ["footer"]}},
//!     "fetched": {"response": {"data": {}, "partials": {}}, "params": {"slug": "my-post"}}
//!   },
//!   "children": [ ... ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::StringMap;

/// Top-level `{ "routes": [...] }` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub routes: Vec<RouteDescriptor>,
}

impl RouterConfig {
    /// The route carrying server-fetched data, searched depth-first.
    pub fn active_route(&self) -> Option<&RouteDescriptor> {
        find_active_route(&self.routes)
    }

    pub fn active_route_mut(&mut self) -> Option<&mut RouteDescriptor> {
        get_active_route(&mut self.routes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Literal URL or dynamic pattern (`:slug`).
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<RouteApi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: None,
            api: None,
            redirect: None,
            children: Vec::new(),
            meta: None,
        }
    }

    /// The route carries an `api.fetched` block.
    pub fn is_active(&self) -> bool {
        self.api.as_ref().is_some_and(|api| api.fetched.is_some())
    }

    pub fn fetched(&self) -> Option<&Fetched> {
        self.api.as_ref().and_then(|api| api.fetched.as_ref())
    }

    pub fn fetched_mut(&mut self) -> Option<&mut Fetched> {
        self.api.as_mut().and_then(|api| api.fetched.as_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteApi {
    pub fetch: FetchSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched: Option<Fetched>,
}

/// How the frontend retrieves the data of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSpec {
    pub url: String,
    pub cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<FetchQuery>,
}

impl FetchSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache: true,
            query: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchQuery {
    #[serde(default)]
    pub partials: Vec<String>,
}

/// Data already fetched on the server for the active route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fetched {
    pub response: FetchedResponse,
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub params: StringMap,
}

impl Fetched {
    pub fn with_data(data: Value) -> Self {
        Self {
            response: FetchedResponse {
                data,
                partials: None,
            },
            params: StringMap::new(),
        }
    }

    /// Placeholder filled in later by the serving view.
    pub fn placeholder() -> Self {
        Self::with_data(Value::Object(serde_json::Map::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedResponse {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partials: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub id: String,
}

/// Depth-first search for the descriptor carrying `api.fetched`.
pub fn get_active_route(routes: &mut [RouteDescriptor]) -> Option<&mut RouteDescriptor> {
    for route in routes.iter_mut() {
        if route.is_active() {
            return Some(route);
        }
        if let Some(found) = get_active_route(&mut route.children) {
            return Some(found);
        }
    }
    None
}

/// Read-only variant of [`get_active_route`].
pub fn find_active_route(routes: &[RouteDescriptor]) -> Option<&RouteDescriptor> {
    routes.iter().find_map(|route| {
        if route.is_active() {
            Some(route)
        } else {
            find_active_route(&route.children)
        }
    })
}

/// Number of descriptors carrying `api.fetched`, nested ones included.
pub fn count_active_routes(routes: &[RouteDescriptor]) -> usize {
    routes
        .iter()
        .map(|r| usize::from(r.is_active()) + count_active_routes(&r.children))
        .sum()
}
