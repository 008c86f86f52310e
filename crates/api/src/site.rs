//! In-memory content site loaded from a JSON site file.
//!
//! The site backs every collaborator of the route builder: it looks up
//! pages and serializes them, renders partials, produces the menu of a
//! request and owns the URL patterns of pages, page API and news app.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use spa_router_core::app_model::ModelView;
use spa_router_core::builder::{PAGE_DETAIL_HOME_ROUTE, PAGE_DETAIL_ROUTE};
use spa_router_core::content::{ContentSource, MenuProvider, Page, PartialSource};
use spa_router_core::error::CoreError;
use spa_router_core::menu::{MenuNode, MenuTree, NodeAttributes, NodeId};
use spa_router_core::naming::page_url;
use spa_router_core::request::RouteRequest;
use spa_router_core::settings::SpaSettings;
use spa_router_core::types::PageId;
use spa_router_core::urls::UrlPatterns;
use spa_router_core::view::CmsPageView;

use crate::news::{NewsArchive, NewsEntry, NEWS_APP, NEWS_DETAIL, NEWS_LIST};
use crate::views::{news_api_urls, NewsDetailView, NewsListView};

/// URL name of the home page view.
pub const CMS_PAGE_HOME: &str = "cms_page_home";
/// URL name of every other page view (`path` argument).
pub const CMS_PAGE: &str = "cms_page";

/// Serialized form of a site file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteData {
    pub settings: SpaSettings,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Partial name -> content. Content that is an object keyed by
    /// language code is localized.
    #[serde(default)]
    pub partials: IndexMap<String, Value>,
    #[serde(default)]
    pub news: Vec<NewsEntry>,
}

#[derive(Debug)]
pub struct Site {
    settings: SpaSettings,
    pages: IndexMap<PageId, Page>,
    partials: IndexMap<String, Value>,
    news: Arc<NewsArchive>,
    urls: UrlPatterns,
}

impl Site {
    pub fn from_json(source: &str) -> Result<Self, CoreError> {
        let data: SiteData = serde_json::from_str(source)
            .map_err(|e| CoreError::Configuration(format!("Invalid site file: {e}")))?;
        Self::from_data(data)
    }

    /// Validate `data` and register the URL patterns of the site.
    pub fn from_data(data: SiteData) -> Result<Self, CoreError> {
        data.settings.default_component()?;

        let mut pages = IndexMap::with_capacity(data.pages.len());
        for page in data.pages {
            if pages.contains_key(&page.id) {
                return Err(CoreError::Configuration(format!("Duplicate page id {}", page.id)));
            }
            pages.insert(page.id, page);
        }
        validate_parents(&pages)?;

        let news = Arc::new(NewsArchive::new(data.news));
        let urls = register_urls(&data.settings, &pages, &news)?;

        tracing::info!(
            pages = pages.len(),
            partials = data.partials.len(),
            news = news.entries().len(),
            "Site loaded"
        );

        Ok(Self {
            settings: data.settings,
            pages,
            partials: data.partials,
            news,
            urls,
        })
    }

    pub fn settings(&self) -> &SpaSettings {
        &self.settings
    }

    pub fn urls(&self) -> &UrlPatterns {
        &self.urls
    }

    pub fn news(&self) -> &NewsArchive {
        &self.news
    }

    /// The page whose title path in `language` is `path`.
    pub fn page_by_path(&self, language: &str, path: &str) -> Option<&Page> {
        let path = path.trim_matches('/');
        self.pages.values().find(|page| {
            page.title(language)
                .is_some_and(|title| title.path.trim_matches('/') == path)
        })
    }

    fn page_attributes(&self, page: &Page) -> NodeAttributes {
        NodeAttributes {
            is_page: true,
            login_required: page.login_required,
            redirect_url: page.redirect_url.clone(),
            use_cache: page.use_cache,
            named_route_path_pattern: page.named_route_path_pattern.clone(),
            ..Default::default()
        }
    }

    fn push_page(
        &self,
        tree: &mut MenuTree,
        parent: Option<NodeId>,
        page: &Page,
        language: &str,
    ) -> Result<(), CoreError> {
        // Untranslated pages hide their whole subtree.
        let Some(title) = page.title(language) else {
            return Ok(());
        };

        let url = page_url(language, &title.path, self.settings.use_i18n_patterns);
        let node = MenuNode::page(page.id, url).with_attributes(self.page_attributes(page));
        let id = match parent {
            Some(parent) => tree.push_child(parent, node),
            None => tree.push_root(node),
        };

        if page.application_urls.as_deref() == Some(NEWS_APP) {
            let routing = self.news.routing();
            for entry in self.news.entries() {
                let child =
                    routing.menu_node(&self.urls, ModelView::Detail, language, &entry.url_values())?;
                tree.push_child(id, child);
            }
        }

        for child in self.pages.values().filter(|p| p.parent == Some(page.id)) {
            self.push_page(tree, Some(id), child, language)?;
        }
        Ok(())
    }
}

fn register_urls(
    settings: &SpaSettings,
    pages: &IndexMap<PageId, Page>,
    news: &Arc<NewsArchive>,
) -> Result<UrlPatterns, CoreError> {
    let prefix = if settings.use_i18n_patterns { "/{lang}" } else { "" };

    let mut urls = news_api_urls()?;
    urls.add(PAGE_DETAIL_HOME_ROUTE, "/api/{lang}/pages/")?
        .add(PAGE_DETAIL_ROUTE, "/api/{lang}/pages/{*path}/")?;

    let hooked = pages
        .values()
        .find(|p| p.application_urls.as_deref() == Some(NEWS_APP));
    if let Some(page) = hooked {
        let language = settings.default_language();
        let title = page.title(language).ok_or_else(|| {
            CoreError::Configuration(format!(
                "News page {} has no title in default language '{language}'",
                page.id
            ))
        })?;
        let base = match title.path.trim_matches('/') {
            "" => format!("{prefix}/"),
            path => format!("{prefix}/{path}/"),
        };
        let api_urls = Arc::new(news_api_urls()?);
        let template = Some(page.template.clone());

        urls.add_view(
            NEWS_LIST,
            &base,
            Arc::new(NewsListView::new(Arc::clone(news), api_urls, template.clone())),
        )?
        .add_view(
            NEWS_DETAIL,
            &format!("{base}{{slug}}/"),
            Arc::new(NewsDetailView::new(Arc::clone(news), template)),
        )?;
    }

    urls.add_view(CMS_PAGE_HOME, &format!("{prefix}/"), Arc::new(CmsPageView))?
        .add_view(CMS_PAGE, &format!("{prefix}/{{*path}}/"), Arc::new(CmsPageView))?;

    tracing::debug!(?urls, "URL patterns registered");
    Ok(urls)
}

/// Content of a partial in `language`.
fn localized<'v>(content: &'v Value, language: &str) -> &'v Value {
    content.get(language).unwrap_or(content)
}

impl ContentSource for Site {
    fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    fn page_data(&self, page: &Page, language: &str, editable: bool) -> Result<Value, CoreError> {
        let title = page
            .title(language)
            .ok_or_else(|| CoreError::not_found("PageTitle", format!("{}/{language}", page.id)))?;

        let mut data = json!({
            "id": page.id,
            "title": title.title,
            "slug": title.slug,
            "path": title.path,
            "template": page.template,
            "containers": page.placeholders,
        });
        if editable {
            data["edit"] = json!({ "page_id": page.id, "language": language });
        }
        Ok(data)
    }
}

impl PartialSource for Site {
    fn render_partials(
        &self,
        names: &[String],
        language: &str,
        editable: bool,
    ) -> Map<String, Value> {
        names
            .iter()
            .filter_map(|name| {
                let content = self.partials.get(name)?;
                let mut partial = json!({ "content": localized(content, language) });
                if editable {
                    partial["editable"] = Value::Bool(true);
                }
                Some((name.clone(), partial))
            })
            .collect()
    }
}

impl MenuProvider for Site {
    fn menu(&self, request: &RouteRequest) -> Result<MenuTree, CoreError> {
        let mut tree = MenuTree::new();
        for page in self.pages.values().filter(|p| p.parent.is_none()) {
            self.push_page(&mut tree, None, page, &request.language)?;
        }
        tree.select_path(&request.path);
        Ok(tree)
    }
}

/// Every parent must exist and no parent chain may loop back on itself.
fn validate_parents(pages: &IndexMap<PageId, Page>) -> Result<(), CoreError> {
    for page in pages.values() {
        let mut visited = HashSet::from([page.id]);
        let mut current = page.parent;
        while let Some(parent) = current {
            let Some(parent_page) = pages.get(&parent) else {
                return Err(CoreError::Configuration(format!(
                    "Page {} has invalid parent {parent}",
                    page.id
                )));
            };
            if !visited.insert(parent) {
                return Err(CoreError::Configuration(format!(
                    "Page {} is part of a parent cycle",
                    page.id
                )));
            }
            current = parent_page.parent;
        }
    }
    Ok(())
}
