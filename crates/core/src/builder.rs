//! Menu tree -> frontend route tree.
//!
//! Two passes over the menu:
//!
//! 1. Every visible node not marked `nest_route` is described, in menu
//!    pre-order. Siblings sharing a `named_route_path_pattern` collapse into
//!    a single dynamic route; the first one is kept unless a later one is the
//!    selected node, which then overwrites it in place.
//! 2. For each emitted route, the `nest_route` children of its node are
//!    grouped by `path_pattern` into nested routes with the same
//!    first-kept, selected-overwrites rule.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::content::{ContentSource, Page, PageTitle, PartialSource};
use crate::error::CoreError;
use crate::menu::{MenuNode, MenuTree, NodeId};
use crate::naming::{page_router_name, page_url, pattern_param, slugify};
use crate::request::RouteRequest;
use crate::route::{FetchQuery, FetchSpec, Fetched, RouteApi, RouteDescriptor, RouteMeta};
use crate::settings::SpaSettings;
use crate::types::StringMap;
use crate::urls::UrlPatterns;

/// URL name of the home page detail API.
pub const PAGE_DETAIL_HOME_ROUTE: &str = "api:cms_page_detail_home";
/// URL name of the page detail API (`path` argument).
pub const PAGE_DETAIL_ROUTE: &str = "api:cms_page_detail";

/// Builds the route tree of one request.
pub struct RouteTreeBuilder<'a> {
    settings: &'a SpaSettings,
    urls: &'a UrlPatterns,
    content: &'a dyn ContentSource,
    partials: &'a dyn PartialSource,
}

impl<'a> RouteTreeBuilder<'a> {
    pub fn new(
        settings: &'a SpaSettings,
        urls: &'a UrlPatterns,
        content: &'a dyn ContentSource,
        partials: &'a dyn PartialSource,
    ) -> Self {
        Self {
            settings,
            urls,
            content,
            partials,
        }
    }

    /// Build the top-level routes for `request`.
    ///
    /// Vanished pages and unresolvable templates only shrink the tree;
    /// configuration mistakes are returned as errors.
    pub fn build(
        &self,
        tree: &MenuTree,
        request: &RouteRequest,
    ) -> Result<Vec<RouteDescriptor>, CoreError> {
        let mut emitted: Vec<(NodeId, RouteDescriptor)> = Vec::new();
        // Keyed by the rewritten path so equal tokens under different
        // parents stay separate routes.
        let mut named_paths: HashMap<String, usize> = HashMap::new();

        for id in tree.preorder() {
            let node = &tree[id];
            if !is_visible(node, request) || node.attributes.nest_route {
                continue;
            }

            let Some(mut route) = self.describe_node(tree, id, request)? else {
                continue;
            };

            if let Some(pattern) = node.attributes.named_route_path_pattern.as_deref() {
                let path = match &node.attributes.named_route_path {
                    Some(path) => path.clone(),
                    None => {
                        let parent_url = tree.parent_of(id).map_or("/", |p| p.url.as_str());
                        format!("{parent_url}{pattern}/")
                    }
                };
                route.name = slugify(&path);

                match named_paths.get(&path) {
                    None => {
                        named_paths.insert(path.clone(), emitted.len());
                        route.path = path;
                    }
                    Some(&index) if node.selected => {
                        route.path = path;
                        emitted[index] = (id, route);
                        continue;
                    }
                    Some(_) => {
                        debug!(url = %node.url, pattern, "Named route already emitted, skipping node");
                        continue;
                    }
                }
            }

            emitted.push((id, route));
        }

        emitted
            .into_iter()
            .map(|(id, mut route)| {
                route.children = self.nested_routes(tree, id, request)?;
                Ok(route)
            })
            .collect()
    }

    /// Nested routes built from the `nest_route` children of `parent`.
    fn nested_routes(
        &self,
        tree: &MenuTree,
        parent: NodeId,
        request: &RouteRequest,
    ) -> Result<Vec<RouteDescriptor>, CoreError> {
        let mut routes: Vec<RouteDescriptor> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for &child_id in tree[parent].children() {
            let child = &tree[child_id];
            if !child.attributes.nest_route || !is_visible(child, request) {
                continue;
            }
            let Some(pattern) = child.attributes.path_pattern.as_deref() else {
                debug!(url = %child.url, "Nested node without path pattern, skipping");
                continue;
            };

            match seen.get(pattern) {
                Some(&index) => {
                    if child.url == request.path {
                        if let Some(route) = self.describe_nested(tree, child_id, pattern, request)? {
                            routes[index] = route;
                        }
                    }
                }
                None => {
                    if let Some(route) = self.describe_nested(tree, child_id, pattern, request)? {
                        seen.insert(pattern, routes.len());
                        routes.push(route);
                    }
                }
            }
        }

        Ok(routes)
    }

    fn describe_nested(
        &self,
        tree: &MenuTree,
        id: NodeId,
        pattern: &str,
        request: &RouteRequest,
    ) -> Result<Option<RouteDescriptor>, CoreError> {
        let Some(mut route) = self.describe_node(tree, id, request)? else {
            return Ok(None);
        };
        route.path = pattern.to_string();
        route.children = self.nested_routes(tree, id, request)?;
        Ok(Some(route))
    }

    /// Describe a single node, or `None` when its content is gone.
    pub fn describe_node(
        &self,
        tree: &MenuTree,
        id: NodeId,
        request: &RouteRequest,
    ) -> Result<Option<RouteDescriptor>, CoreError> {
        let node = &tree[id];

        let (mut route, page) = if node.attributes.is_page {
            let Some(page) = node.id.and_then(|page_id| self.content.page(page_id)) else {
                debug!(page_id = ?node.id, url = %node.url, "Page no longer exists, omitting route");
                return Ok(None);
            };
            match self.describe_page(tree, id, page, request)? {
                Some(route) => (route, Some(page)),
                None => return Ok(None),
            }
        } else {
            (self.describe_app_model(node, request)?, None)
        };

        let template = self.node_template_name(node, page);

        if let Some(api) = route.api.as_mut() {
            if !node.attributes.use_cache {
                api.fetch.cache = false;
            }

            if is_request_node(node, request) {
                if let Some(fetched) = api.fetched.as_mut() {
                    let names = self.settings.partials_for_template(&template);
                    fetched.response.partials = Some(self.partials.render_partials(
                        names,
                        &request.language,
                        request.can_edit_partials,
                    ));
                }
            }

            let always = self.settings.partials_for_template(&template);
            if !always.is_empty() {
                let query = api.fetch.query.get_or_insert_with(FetchQuery::default);
                for name in always {
                    if !query.partials.contains(name) {
                        query.partials.push(name.clone());
                    }
                }
            }
        }

        if node.attributes.redirect_url.is_some() {
            route.api = None;
        }

        Ok(Some(route))
    }

    fn describe_page(
        &self,
        tree: &MenuTree,
        id: NodeId,
        page: &Page,
        request: &RouteRequest,
    ) -> Result<Option<RouteDescriptor>, CoreError> {
        let node = &tree[id];
        let language = request.language.as_str();
        let Some(title) = page.title(language) else {
            debug!(page_id = page.id, language, "Page has no title in this language, omitting route");
            return Ok(None);
        };

        let mut route = RouteDescriptor::new(
            page_url(language, &title.path, self.settings.use_i18n_patterns),
            page_router_name(page.id),
        );

        if node.attributes.redirect_url.is_none() {
            route.component = Some(self.page_component(page)?);
        }
        route.redirect = node.attributes.redirect_url.clone();
        route.meta = page.reverse_id.clone().map(|id| RouteMeta { id });

        let mut api = RouteApi {
            fetch: FetchSpec::new(self.page_fetch_url(node, page, title, language)?),
            fetched: None,
        };

        if is_request_node(node, request) {
            let data = match self.content.page_data(page, language, request.can_edit_pages) {
                Ok(data) => data,
                Err(CoreError::NotFound { entity, key }) => {
                    debug!(entity, key, "Page content vanished, omitting route");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };
            let mut fetched = Fetched::with_data(data);
            if let Some(pattern) = node.attributes.named_route_path_pattern.as_deref() {
                let param = pattern_param(pattern);
                if !param.is_empty() {
                    fetched.params.insert(param.to_string(), title.slug.clone());
                }
            }
            api.fetched = Some(fetched);
        }

        route.api = Some(api);
        Ok(Some(route))
    }

    fn page_component(&self, page: &Page) -> Result<String, CoreError> {
        match self.settings.component_for_template(&page.template) {
            Ok(component) => Ok(component),
            Err(err) => {
                warn!(page_id = page.id, error = %err, "Falling back to default component");
                self.settings.default_component()
            }
        }
    }

    fn page_fetch_url(
        &self,
        node: &MenuNode,
        page: &Page,
        title: &PageTitle,
        language: &str,
    ) -> Result<String, CoreError> {
        let delegates = page
            .application_urls
            .as_ref()
            .is_some_and(|app| self.settings.apphooks_with_root_url.contains(app));
        if delegates {
            let view = self
                .urls
                .resolve(&node.url)
                .and_then(|resolved| resolved.view)
                .ok_or_else(|| {
                    CoreError::Configuration(format!("No view serves app-hook page '{}'", node.url))
                })?;
            return view.fetch_url(language);
        }

        if title.path.trim_matches('/').is_empty() {
            return self
                .urls
                .reverse(PAGE_DETAIL_HOME_ROUTE, language, &StringMap::new());
        }

        if let Some(pattern) = node.attributes.named_route_path_pattern.as_deref() {
            let parent = self.page_detail_url(title.parent_path(), language)?;
            return Ok(format!("{parent}{pattern}/"));
        }

        self.page_detail_url(&title.path, language)
    }

    fn page_detail_url(&self, path: &str, language: &str) -> Result<String, CoreError> {
        if path.trim_matches('/').is_empty() {
            return self
                .urls
                .reverse(PAGE_DETAIL_HOME_ROUTE, language, &StringMap::new());
        }
        let mut kwargs = StringMap::new();
        kwargs.insert("path".into(), path.to_string());
        self.urls.reverse(PAGE_DETAIL_ROUTE, language, &kwargs)
    }

    fn describe_app_model(
        &self,
        node: &MenuNode,
        request: &RouteRequest,
    ) -> Result<RouteDescriptor, CoreError> {
        let name = node
            .attributes
            .router_name
            .clone()
            .unwrap_or_else(|| slugify(&node.url));
        let mut route = RouteDescriptor::new(node.url.clone(), name);
        route.component = node.attributes.component.clone();
        route.redirect = node.attributes.redirect_url.clone();
        route.meta = node.attributes.meta_id.clone().map(|id| RouteMeta { id });

        let fetch_url = match (&node.attributes.fetch_url, &node.attributes.redirect_url) {
            (Some(url), _) => url.clone(),
            (None, Some(_)) => String::new(),
            (None, None) => {
                return Err(CoreError::Configuration(format!(
                    "Menu node '{}' has no fetch_url",
                    node.url
                )))
            }
        };

        let mut api = RouteApi {
            fetch: FetchSpec::new(fetch_url),
            fetched: None,
        };
        if self.matches_request(node, request) {
            let mut fetched = Fetched::placeholder();
            fetched.params = node.attributes.url_params.clone();
            api.fetched = Some(fetched);
        }
        route.api = Some(api);

        Ok(route)
    }

    /// Exact path match, or both paths resolve to the same URL name
    /// (dynamic segments of one view differ literally).
    fn matches_request(&self, node: &MenuNode, request: &RouteRequest) -> bool {
        if node.url == request.path {
            return true;
        }
        match (self.urls.route_name(&request.path), self.urls.route_name(&node.url)) {
            (Some(requested), Some(own)) => requested == own,
            _ => false,
        }
    }

    /// Template identifier of a node, used to look up its partials.
    fn node_template_name(&self, node: &MenuNode, page: Option<&Page>) -> String {
        let Some(view) = self.urls.resolve(&node.url).and_then(|r| r.view) else {
            return self.settings.error_404_template.clone();
        };
        if view.is_cms_page() {
            node.attributes
                .template
                .clone()
                .or_else(|| page.map(|p| p.template.clone()))
                .unwrap_or_else(|| self.settings.error_404_template.clone())
        } else {
            view.template_name()
                .map(str::to_string)
                .unwrap_or_else(|| self.settings.default_template.clone())
        }
    }
}

fn is_visible(node: &MenuNode, request: &RouteRequest) -> bool {
    !node.attributes.login_required || request.authenticated
}

fn is_request_node(node: &MenuNode, request: &RouteRequest) -> bool {
    node.selected && node.url == request.path
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::menu::{MenuNode, NodeAttributes};
    use crate::route::count_active_routes;
    use crate::types::PageId;
    use crate::view::{CmsPageView, RouterView};

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    struct Content {
        pages: HashMap<PageId, Page>,
    }

    impl ContentSource for Content {
        fn page(&self, id: PageId) -> Option<&Page> {
            self.pages.get(&id)
        }

        fn page_data(&self, page: &Page, language: &str, editable: bool) -> Result<Value, CoreError> {
            let title = page
                .title(language)
                .ok_or_else(|| CoreError::not_found("PageTitle", page.id))?;
            Ok(json!({"id": page.id, "title": title.title, "editable": editable}))
        }
    }

    struct Partials;

    impl PartialSource for Partials {
        fn render_partials(&self, names: &[String], _language: &str, editable: bool) -> Map<String, Value> {
            names
                .iter()
                .map(|n| (n.clone(), json!({"name": n, "editable": editable})))
                .collect()
        }
    }

    struct NewsHookView {
        fetch_url: Option<&'static str>,
    }

    impl RouterView for NewsHookView {
        fn template_name(&self) -> Option<&str> {
            Some("news.html")
        }

        fn fetch_url(&self, language: &str) -> Result<String, CoreError> {
            match self.fetch_url {
                Some(url) => Ok(url.replace("{lang}", language)),
                None => Err(CoreError::Configuration("No fetch URL".into())),
            }
        }
    }

    fn settings() -> SpaSettings {
        serde_json::from_value(json!({
            "templates": {
                "default.html": {"frontend_component_name": "page-default", "partials": ["menu"]},
                "news.html": {"frontend_component_name": "news-list", "partials": ["menu", "footer"]}
            },
            "default_template": "default.html",
            "error_404_template": "404.html"
        }))
        .unwrap()
    }

    fn urls(hook_fetch_url: Option<&'static str>) -> UrlPatterns {
        let mut urls = UrlPatterns::new();
        urls.add(PAGE_DETAIL_HOME_ROUTE, "/api/{lang}/pages/")
            .unwrap()
            .add(PAGE_DETAIL_ROUTE, "/api/{lang}/pages/{*path}/")
            .unwrap()
            .add_view(
                "news_list",
                "/{lang}/news/",
                Arc::new(NewsHookView {
                    fetch_url: hook_fetch_url,
                }),
            )
            .unwrap()
            .add_view(
                "news_detail",
                "/{lang}/news/{slug}/",
                Arc::new(NewsHookView {
                    fetch_url: hook_fetch_url,
                }),
            )
            .unwrap()
            .add_view("cms_page_home", "/{lang}/", Arc::new(CmsPageView))
            .unwrap()
            .add_view("cms_page", "/{lang}/{*path}/", Arc::new(CmsPageView))
            .unwrap();
        urls
    }

    fn page(id: PageId, path: &str, template: &str) -> Page {
        let slug = path.rsplit('/').next().unwrap_or_default().to_string();
        serde_json::from_value(json!({
            "id": id,
            "template": template,
            "titles": {"en": {"title": format!("Page {id}"), "slug": slug, "path": path}}
        }))
        .unwrap()
    }

    fn content() -> Content {
        let mut news = page(6, "news", "news.html");
        news.application_urls = Some("news".into());
        news.reverse_id = Some("news".into());
        let pages = [
            page(1, "", "default.html"),
            page(2, "a", "default.html"),
            page(3, "b", "default.html"),
            page(4, "b/b1", "default.html"),
            page(5, "c", "default.html"),
            news,
            page(7, "topics", "default.html"),
            page(8, "topics/rust", "default.html"),
            page(9, "topics/go", "default.html"),
        ];
        Content {
            pages: pages.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    fn page_node(id: PageId, url: &str) -> MenuNode {
        MenuNode::page(id, url)
    }

    fn news_detail_node(slug: &str) -> MenuNode {
        let mut attributes = NodeAttributes {
            nest_route: true,
            path_pattern: Some(":slug".into()),
            component: Some("news-detail".into()),
            router_name: Some("news-detail".into()),
            fetch_url: Some("/api/en/news/:slug/".into()),
            meta_id: Some(slug.to_string()),
            ..Default::default()
        };
        attributes.url_params.insert("slug".into(), slug.to_string());
        MenuNode::new(format!("/en/news/{slug}/")).with_attributes(attributes)
    }

    /// Home, A, B (B1), C, News (first, second).
    fn site_menu(request_path: &str) -> MenuTree {
        let mut tree = MenuTree::new();
        tree.push_root(page_node(1, "/en/"));
        tree.push_root(page_node(2, "/en/a/"));
        let b = tree.push_root(page_node(3, "/en/b/"));
        tree.push_child(b, page_node(4, "/en/b/b1/"));
        tree.push_root(page_node(5, "/en/c/"));
        let news = tree.push_root(page_node(6, "/en/news/"));
        tree.push_child(news, news_detail_node("first"));
        tree.push_child(news, news_detail_node("second"));
        tree.select_path(request_path);
        tree
    }

    fn topic_node(id: PageId, url: &str) -> MenuNode {
        let mut node = page_node(id, url);
        node.attributes.named_route_path_pattern = Some(":topic".into());
        node
    }

    /// Topics (rust, go) with a shared named pattern.
    fn topics_menu(request_path: &str) -> MenuTree {
        let mut tree = MenuTree::new();
        let topics = tree.push_root(page_node(7, "/en/topics/"));
        tree.push_child(topics, topic_node(8, "/en/topics/rust/"));
        tree.push_child(topics, topic_node(9, "/en/topics/go/"));
        tree.select_path(request_path);
        tree
    }

    fn build_with(
        content: &Content,
        settings: &SpaSettings,
        urls: &UrlPatterns,
        tree: &MenuTree,
        request: &RouteRequest,
    ) -> Result<Vec<RouteDescriptor>, CoreError> {
        RouteTreeBuilder::new(settings, urls, content, &Partials).build(tree, request)
    }

    fn build(tree: &MenuTree, path: &str) -> Vec<RouteDescriptor> {
        build_with(
            &content(),
            &settings(),
            &urls(None),
            tree,
            &RouteRequest::anonymous(path, "en"),
        )
        .unwrap()
    }

    fn paths(routes: &[RouteDescriptor]) -> Vec<&str> {
        routes.iter().map(|r| r.path.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Pass 1
    // -----------------------------------------------------------------------

    #[test]
    fn flat_routes_in_menu_order() {
        let routes = build(&site_menu("/en/a/"), "/en/a/");

        assert_eq!(
            paths(&routes),
            ["/en/", "/en/a/", "/en/b/", "/en/b/b1/", "/en/c/", "/en/news/"]
        );
        assert_eq!(routes[1].name, "cms-page-2");
        assert_eq!(routes[1].component.as_deref(), Some("page-default"));
        assert_eq!(routes[5].meta, Some(RouteMeta { id: "news".into() }));
    }

    #[test]
    fn page_fetch_urls() {
        let routes = build(&site_menu("/en/"), "/en/");

        let fetch_url = |i: usize| routes[i].api.as_ref().unwrap().fetch.url.clone();
        assert_eq!(fetch_url(0), "/api/en/pages/");
        assert_eq!(fetch_url(3), "/api/en/pages/b/b1/");
        assert_eq!(fetch_url(5), "/api/en/pages/news/");
    }

    #[test]
    fn selected_page_carries_data_and_partials() {
        let routes = build(&site_menu("/en/a/"), "/en/a/");

        let fetched = routes[1].fetched().unwrap();
        assert_eq!(fetched.response.data["id"], 2);
        assert_eq!(fetched.response.data["editable"], false);
        let partials = fetched.response.partials.as_ref().unwrap();
        assert_eq!(partials.keys().collect::<Vec<_>>(), ["menu"]);
        assert!(fetched.params.is_empty());
        assert_eq!(count_active_routes(&routes), 1);
    }

    #[test]
    fn template_partials_requested_on_every_route() {
        let routes = build(&site_menu("/en/"), "/en/");

        let query = |i: usize| {
            routes[i]
                .api
                .as_ref()
                .unwrap()
                .fetch
                .query
                .as_ref()
                .unwrap()
                .partials
                .clone()
        };
        assert_eq!(query(2), ["menu"]);
        assert_eq!(query(5), ["menu", "footer"]);
    }

    #[test]
    fn unknown_request_path_has_no_active_route() {
        let routes = build(&site_menu("/en/missing/"), "/en/missing/");

        assert_eq!(routes.len(), 6);
        assert_eq!(count_active_routes(&routes), 0);
    }

    #[test]
    fn login_required_nodes_hidden_from_anonymous() {
        let mut tree = site_menu("/en/");
        let c = tree.preorder()[4];
        tree.get_mut(c).unwrap().attributes.login_required = true;

        let anonymous = build(&tree, "/en/");
        assert!(!paths(&anonymous).contains(&"/en/c/"));

        let mut request = RouteRequest::anonymous("/en/", "en");
        request.authenticated = true;
        let authenticated =
            build_with(&content(), &settings(), &urls(None), &tree, &request).unwrap();
        assert!(paths(&authenticated).contains(&"/en/c/"));
    }

    #[test]
    fn vanished_page_is_omitted() {
        let mut content = content();
        content.pages.remove(&3);

        let routes = build_with(
            &content,
            &settings(),
            &urls(None),
            &site_menu("/en/b/"),
            &RouteRequest::anonymous("/en/b/", "en"),
        )
        .unwrap();

        assert_eq!(
            paths(&routes),
            ["/en/", "/en/a/", "/en/b/b1/", "/en/c/", "/en/news/"]
        );
        assert_eq!(count_active_routes(&routes), 0);
    }

    #[test]
    fn page_without_translation_is_omitted() {
        let routes = build_with(
            &content(),
            &settings(),
            &urls(None),
            &site_menu("/de/"),
            &RouteRequest::anonymous("/de/", "de"),
        )
        .unwrap();

        assert!(routes.is_empty());
    }

    #[test]
    fn redirect_drops_api_and_component() {
        let mut tree = site_menu("/en/c/");
        let c = tree.preorder()[4];
        tree.get_mut(c).unwrap().attributes.redirect_url = Some("/en/a/".into());

        let routes = build(&tree, "/en/c/");
        let c = &routes[4];
        assert_eq!(c.redirect.as_deref(), Some("/en/a/"));
        assert!(c.api.is_none());
        assert!(c.component.is_none());
        assert!(serde_json::to_value(c).unwrap().get("api").is_none());
    }

    #[test]
    fn use_cache_opt_out() {
        let mut tree = site_menu("/en/");
        let a = tree.preorder()[1];
        tree.get_mut(a).unwrap().attributes.use_cache = false;

        let routes = build(&tree, "/en/");
        assert!(routes[0].api.as_ref().unwrap().fetch.cache);
        assert!(!routes[1].api.as_ref().unwrap().fetch.cache);
    }

    #[test]
    fn unknown_template_falls_back_to_default_component() {
        let mut content = content();
        content.pages.get_mut(&2).unwrap().template = "gone.html".into();

        let routes = build_with(
            &content,
            &settings(),
            &urls(None),
            &site_menu("/en/"),
            &RouteRequest::anonymous("/en/", "en"),
        )
        .unwrap();
        assert_eq!(routes[1].component.as_deref(), Some("page-default"));
    }

    #[test]
    fn unresolvable_node_url_uses_error_template() {
        let mut tree = MenuTree::new();
        tree.push_root(page_node(2, "/elsewhere"));
        tree.select_path("/elsewhere");

        let routes = build(&tree, "/elsewhere");
        // The 404 template declares no partials.
        let fetched = routes[0].fetched().unwrap();
        assert_eq!(fetched.response.partials, Some(Map::new()));
        assert!(routes[0].api.as_ref().unwrap().fetch.query.is_none());
    }

    #[test]
    fn build_is_idempotent() {
        let tree = site_menu("/en/news/first/");
        let first = serde_json::to_string(&build(&tree, "/en/news/first/")).unwrap();
        let second = serde_json::to_string(&build(&tree, "/en/news/first/")).unwrap();
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // Named routes
    // -----------------------------------------------------------------------

    #[test]
    fn named_routes_collapse_to_first() {
        let routes = build(&topics_menu("/en/topics/"), "/en/topics/");

        assert_eq!(paths(&routes), ["/en/topics/", "/en/topics/:topic/"]);
        let named = &routes[1];
        assert_eq!(named.name, "entopicstopic");
        assert_eq!(named.component.as_deref(), Some("page-default"));
        assert_eq!(named.api.as_ref().unwrap().fetch.url, "/api/en/pages/topics/:topic/");
        assert!(!named.is_active());
        assert_eq!(count_active_routes(&routes), 1);
    }

    #[test]
    fn selected_named_route_overwrites_first() {
        let routes = build(&topics_menu("/en/topics/go/"), "/en/topics/go/");

        assert_eq!(routes.len(), 2);
        let named = &routes[1];
        assert_eq!(named.path, "/en/topics/:topic/");
        let fetched = named.fetched().unwrap();
        assert_eq!(fetched.response.data["id"], 9);
        assert_eq!(fetched.params["topic"], "go");
    }

    #[test]
    fn named_route_path_overrides_rewrite() {
        let mut tree = topics_menu("/en/topics/");
        for id in tree.preorder() {
            let node = tree.get_mut(id).unwrap();
            if node.attributes.named_route_path_pattern.is_some() {
                node.attributes.named_route_path = Some("/en/t/:topic/".into());
            }
        }

        let routes = build(&tree, "/en/topics/");
        assert_eq!(routes[1].path, "/en/t/:topic/");
        assert_eq!(routes[1].name, "enttopic");
    }

    /// Topics and Tags both use `:topic` for their children.
    fn topics_and_tags(request_path: &str) -> (Content, MenuTree) {
        let mut content = content();
        for page in [
            page(10, "tags", "default.html"),
            page(11, "tags/red", "default.html"),
            page(12, "tags/blue", "default.html"),
        ] {
            content.pages.insert(page.id, page);
        }

        let mut tree = topics_menu(request_path);
        let tags = tree.push_root(page_node(10, "/en/tags/"));
        tree.push_child(tags, topic_node(11, "/en/tags/red/"));
        tree.push_child(tags, topic_node(12, "/en/tags/blue/"));
        tree.select_path(request_path);
        (content, tree)
    }

    #[test]
    fn shared_token_under_different_parents_emits_one_route_each() {
        for request_path in ["/en/topics/", "/en/tags/red/"] {
            let (content, tree) = topics_and_tags(request_path);
            let routes = build_with(
                &content,
                &settings(),
                &urls(None),
                &tree,
                &RouteRequest::anonymous(request_path, "en"),
            )
            .unwrap();

            assert_eq!(
                paths(&routes),
                ["/en/topics/", "/en/topics/:topic/", "/en/tags/", "/en/tags/:topic/"],
                "{request_path}"
            );
        }
    }

    #[test]
    fn selected_shared_token_overwrites_only_its_own_group() {
        let (content, tree) = topics_and_tags("/en/tags/red/");
        let routes = build_with(
            &content,
            &settings(),
            &urls(None),
            &tree,
            &RouteRequest::anonymous("/en/tags/red/", "en"),
        )
        .unwrap();

        assert!(!routes[1].is_active());
        assert_eq!(routes[1].name, "entopicstopic");
        let tags = &routes[3];
        assert_eq!(tags.name, "entagstopic");
        let fetched = tags.fetched().unwrap();
        assert_eq!(fetched.response.data["id"], 11);
        assert_eq!(fetched.params["topic"], "red");
    }

    #[test]
    fn route_names_unique_per_level() {
        let routes = build(&topics_menu("/en/topics/rust/"), "/en/topics/rust/");
        let mut names: Vec<_> = routes.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), routes.len());
    }

    // -----------------------------------------------------------------------
    // Pass 2
    // -----------------------------------------------------------------------

    #[test]
    fn nested_detail_routes_deduplicated_by_pattern() {
        let routes = build(&site_menu("/en/news/first/"), "/en/news/first/");

        assert_eq!(routes.len(), 6);
        let news = &routes[5];
        assert!(!news.is_active());
        assert_eq!(news.children.len(), 1);

        let child = &news.children[0];
        assert_eq!(child.path, ":slug");
        assert_eq!(child.name, "news-detail");
        assert_eq!(child.component.as_deref(), Some("news-detail"));
        assert_eq!(child.meta, Some(RouteMeta { id: "first".into() }));
        let fetched = child.fetched().unwrap();
        assert_eq!(fetched.response.data, json!({}));
        assert_eq!(fetched.params["slug"], "first");
        assert_eq!(count_active_routes(&routes), 1);
    }

    #[test]
    fn later_active_child_replaces_first() {
        let routes = build(&site_menu("/en/news/second/"), "/en/news/second/");

        let children = &routes[5].children;
        assert_eq!(children.len(), 1);
        let fetched = children[0].fetched().unwrap();
        assert_eq!(fetched.params["slug"], "second");
        assert_eq!(children[0].meta, Some(RouteMeta { id: "second".into() }));
        assert_eq!(count_active_routes(&routes), 1);
    }

    #[test]
    fn nested_child_partials_from_view_template() {
        let routes = build(&site_menu("/en/news/first/"), "/en/news/first/");

        let child = &routes[5].children[0];
        let query = child.api.as_ref().unwrap().fetch.query.as_ref().unwrap();
        assert_eq!(query.partials, ["menu", "footer"]);
        let partials = child.fetched().unwrap().response.partials.as_ref().unwrap();
        assert!(partials.contains_key("footer"));
    }

    #[test]
    fn childless_routes_have_no_children_key() {
        let routes = build(&site_menu("/en/"), "/en/");
        let value = serde_json::to_value(&routes[0]).unwrap();
        assert!(value.get("children").is_none());
    }

    #[test]
    fn nested_children_respect_login_required() {
        let mut tree = site_menu("/en/news/");
        for id in tree.preorder() {
            let node = tree.get_mut(id).unwrap();
            if node.attributes.nest_route {
                node.attributes.login_required = true;
            }
        }

        let routes = build(&tree, "/en/news/");
        assert!(routes[5].children.is_empty());
    }

    // -----------------------------------------------------------------------
    // App hooks and configuration errors
    // -----------------------------------------------------------------------

    #[test]
    fn app_hook_page_uses_view_fetch_url() {
        let mut settings = settings();
        settings.apphooks_with_root_url = vec!["news".into()];

        let routes = build_with(
            &content(),
            &settings,
            &urls(Some("/api/{lang}/news/")),
            &site_menu("/en/news/"),
            &RouteRequest::anonymous("/en/news/", "en"),
        )
        .unwrap();

        let news = &routes[5];
        assert_eq!(news.api.as_ref().unwrap().fetch.url, "/api/en/news/");
        assert_eq!(news.fetched().unwrap().response.data["id"], 6);
    }

    #[test]
    fn app_hook_view_without_fetch_url_fails_build() {
        let mut settings = settings();
        settings.apphooks_with_root_url = vec!["news".into()];

        let result = build_with(
            &content(),
            &settings,
            &urls(None),
            &site_menu("/en/"),
            &RouteRequest::anonymous("/en/", "en"),
        );
        assert_matches!(result, Err(CoreError::Configuration(_)));
    }

    #[test]
    fn app_model_node_without_fetch_url_fails_build() {
        let mut tree = site_menu("/en/");
        for id in tree.preorder() {
            let node = tree.get_mut(id).unwrap();
            if node.attributes.nest_route {
                node.attributes.fetch_url = None;
            }
        }

        let result = build_with(
            &content(),
            &settings(),
            &urls(None),
            &tree,
            &RouteRequest::anonymous("/en/", "en"),
        );
        assert_matches!(result, Err(CoreError::Configuration(msg)) if msg.contains("fetch_url"));
    }

    #[test]
    fn editable_flags_reach_collaborators() {
        let mut request = RouteRequest::anonymous("/en/a/", "en");
        request.authenticated = true;
        request.can_edit_pages = true;

        let routes = build_with(&content(), &settings(), &urls(None), &site_menu("/en/a/"), &request)
            .unwrap();
        let fetched = routes[1].fetched().unwrap();
        assert_eq!(fetched.response.data["editable"], true);
        assert_eq!(fetched.response.partials.as_ref().unwrap()["menu"]["editable"], false);
    }
}
