//! Content records and the collaborators that provide them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::menu::MenuTree;
use crate::request::RouteRequest;
use crate::types::PageId;

/// Language-specific title data of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTitle {
    pub title: String,
    pub slug: String,
    /// Full path below the language root, without surrounding slashes.
    /// Empty for the home page.
    #[serde(default)]
    pub path: String,
}

impl PageTitle {
    /// Path of the parent page, derived by dropping the last segment.
    pub fn parent_path(&self) -> &str {
        let path = self.path.trim_matches('/');
        match path.rfind('/') {
            Some(index) => &path[..index],
            None => "",
        }
    }
}

/// A CMS page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub parent: Option<PageId>,
    pub template: String,
    #[serde(default)]
    pub titles: IndexMap<String, PageTitle>,
    #[serde(default)]
    pub reverse_id: Option<String>,
    /// Application hooked into this page.
    #[serde(default)]
    pub application_urls: Option<String>,
    #[serde(default)]
    pub login_required: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
    /// Pages sharing this pattern render as one dynamic route.
    #[serde(default)]
    pub named_route_path_pattern: Option<String>,
    #[serde(default)]
    pub placeholders: Map<String, Value>,
}

fn default_use_cache() -> bool {
    true
}

impl Page {
    pub fn title(&self, language: &str) -> Option<&PageTitle> {
        self.titles.get(language)
    }
}

/// Page lookup and frontend serialization.
pub trait ContentSource {
    /// `None` when the page no longer exists.
    fn page(&self, id: PageId) -> Option<&Page>;

    /// JSON representation of a page. `editable` exposes admin-only fields.
    fn page_data(&self, page: &Page, language: &str, editable: bool) -> Result<Value, CoreError>;
}

/// Renders named shared fragments (navigation, footer, ...).
pub trait PartialSource {
    /// Data of every known partial in `names`; unknown names are left out.
    fn render_partials(&self, names: &[String], language: &str, editable: bool)
        -> Map<String, Value>;
}

/// Supplies the permission-filtered menu of a request.
pub trait MenuProvider {
    fn menu(&self, request: &RouteRequest) -> Result<MenuTree, CoreError>;
}
