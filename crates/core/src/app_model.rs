//! Routing of application models (news entries, projects, ...) that are not
//! CMS pages but still appear in the router.
//!
//! A model declares two URL groups: `api` (JSON endpoints the frontend
//! fetches) and `normal` (public URLs), each with a list and a detail view.
//! Detail routes are exposed to the frontend as patterns such as
//! `/api/en/news/:slug/` so one route serves every record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::menu::{MenuNode, NodeAttributes};
use crate::types::StringMap;
use crate::urls::UrlPatterns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    Api,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelView {
    List,
    Detail,
}

/// URL names of the list and detail views of one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRoutes {
    pub list: String,
    pub detail: String,
}

impl ViewRoutes {
    fn get(&self, view: ModelView) -> &str {
        match view {
            ModelView::List => &self.list,
            ModelView::Detail => &self.detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGroups {
    pub api: ViewRoutes,
    pub normal: ViewRoutes,
}

/// A URL keyword argument and the record attribute filling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParameter {
    pub parameter: String,
    pub attribute: String,
}

impl RouteParameter {
    /// Parameter and attribute share the same name.
    pub fn same(name: &str) -> Self {
        Self {
            parameter: name.to_string(),
            attribute: name.to_string(),
        }
    }
}

/// Keyword arguments needed by the views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewParameters {
    #[serde(default)]
    pub list: Vec<RouteParameter>,
    #[serde(default)]
    pub detail: Vec<RouteParameter>,
}

impl ViewParameters {
    fn get(&self, view: ModelView) -> &[RouteParameter] {
        match view {
            ModelView::List => &self.list,
            ModelView::Detail => &self.detail,
        }
    }
}

/// `{name, fetch}` link to a record's detail route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLink {
    pub name: String,
    pub fetch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppModelRouting {
    pub router_name: String,
    pub router_component: String,
    /// URL parameter -> frontend token (`slug` -> `:slug`).
    pub route_patterns: StringMap,
    pub routes: RouteGroups,
    #[serde(default)]
    pub route_parameters: ViewParameters,
}

impl AppModelRouting {
    pub fn url_name(&self, group: RouteGroup, view: ModelView) -> &str {
        match group {
            RouteGroup::Api => self.routes.api.get(view),
            RouteGroup::Normal => self.routes.normal.get(view),
        }
    }

    /// Concrete URL of a view for the record whose attributes are `values`.
    pub fn url(
        &self,
        urls: &UrlPatterns,
        group: RouteGroup,
        view: ModelView,
        language: &str,
        values: &StringMap,
    ) -> Result<String, CoreError> {
        let mut kwargs = StringMap::new();
        for param in self.route_parameters.get(view) {
            let value = values.get(&param.attribute).ok_or_else(|| {
                CoreError::Configuration(format!(
                    "'{}' has no attribute '{}' for URL parameter '{}'",
                    self.router_name, param.attribute, param.parameter
                ))
            })?;
            kwargs.insert(param.parameter.clone(), value.clone());
        }
        urls.reverse(self.url_name(group, view), language, &kwargs)
    }

    /// URL of a view with every parameter left as its frontend token.
    pub fn pattern_url(
        &self,
        urls: &UrlPatterns,
        group: RouteGroup,
        view: ModelView,
        language: &str,
    ) -> Result<String, CoreError> {
        let kwargs: StringMap = self
            .route_parameters
            .get(view)
            .iter()
            .map(|param| (param.parameter.clone(), self.token(&param.parameter)))
            .collect();
        urls.reverse(self.url_name(group, view), language, &kwargs)
    }

    fn token(&self, parameter: &str) -> String {
        self.route_patterns
            .get(parameter)
            .cloned()
            .unwrap_or_else(|| format!(":{parameter}"))
    }

    /// Relative dynamic segment of the nested detail route (`:slug`).
    pub fn detail_path_pattern(&self) -> String {
        self.route_parameters
            .detail
            .iter()
            .map(|param| self.token(&param.parameter))
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn link(
        &self,
        urls: &UrlPatterns,
        language: &str,
        values: &StringMap,
    ) -> Result<ModelLink, CoreError> {
        Ok(ModelLink {
            name: self.router_name.clone(),
            fetch: self.url(urls, RouteGroup::Api, ModelView::Detail, language, values)?,
        })
    }

    /// Attributes of a menu node for one record.
    ///
    /// Detail nodes are nested under the hooked page's route and share the
    /// detail path pattern.
    pub fn menu_node_attributes(
        &self,
        urls: &UrlPatterns,
        view: ModelView,
        language: &str,
        values: &StringMap,
    ) -> Result<NodeAttributes, CoreError> {
        let url_params = self
            .route_parameters
            .get(view)
            .iter()
            .filter_map(|param| {
                values
                    .get(&param.attribute)
                    .map(|v| (param.parameter.clone(), v.clone()))
            })
            .collect();

        Ok(NodeAttributes {
            nest_route: view == ModelView::Detail,
            path_pattern: (view == ModelView::Detail).then(|| self.detail_path_pattern()),
            component: Some(self.router_component.clone()),
            router_name: Some(self.router_name.clone()),
            fetch_url: Some(self.pattern_url(urls, RouteGroup::Api, view, language)?),
            url_params,
            ..Default::default()
        })
    }

    /// A menu node for one record.
    pub fn menu_node(
        &self,
        urls: &UrlPatterns,
        view: ModelView,
        language: &str,
        values: &StringMap,
    ) -> Result<MenuNode, CoreError> {
        let url = self.url(urls, RouteGroup::Normal, view, language, values)?;
        let attributes = self.menu_node_attributes(urls, view, language, values)?;
        Ok(MenuNode::new(url).with_attributes(attributes))
    }
}
