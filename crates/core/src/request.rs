/// The request a route tree is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    /// Request path, e.g. `/en/news/my-post/`.
    pub path: String,
    /// Active language code.
    pub language: String,
    pub authenticated: bool,
    /// May see admin-only page fields.
    pub can_edit_pages: bool,
    /// May see admin-only fields of shared partials.
    pub can_edit_partials: bool,
}

impl RouteRequest {
    /// An unauthenticated visitor.
    pub fn anonymous(path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            authenticated: false,
            can_edit_pages: false,
            can_edit_partials: false,
        }
    }
}
