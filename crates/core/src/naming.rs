//! Route naming and path conventions.
//!
//! Route names must be stable across requests so the frontend router can
//! address them by name, which is why they are derived from page ids and
//! from pattern paths rather than from titles.

use crate::types::PageId;

/// Router name of a CMS page route.
///
/// ```
/// use spa_router_core::naming::page_router_name;
///
/// assert_eq!(page_router_name(7), "cms-page-7");
/// ```
pub fn page_router_name(id: PageId) -> String {
    format!("cms-page-{id}")
}

/// Slugify a string the way Django's `slugify` does for ASCII input.
///
/// Lowercases, drops every character that is not a word character,
/// whitespace or hyphen, collapses runs of whitespace and hyphens into a
/// single hyphen, and trims leading/trailing hyphens and underscores.
/// Non-ASCII characters are dropped.
///
/// ```
/// use spa_router_core::naming::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("/en/news/:slug/"), "ennewsslug");
/// ```
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut result = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_separator {
                result.push('-');
            }
            in_separator = true;
        } else {
            result.push(c);
            in_separator = false;
        }
    }

    result.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Public URL of a page from its language and title path.
///
/// The home page has an empty title path and maps to the language root.
pub fn page_url(language: &str, title_path: &str, use_i18n_patterns: bool) -> String {
    let title_path = title_path.trim_matches('/');
    match (use_i18n_patterns, title_path.is_empty()) {
        (true, true) => format!("/{language}/"),
        (true, false) => format!("/{language}/{title_path}/"),
        (false, true) => "/".to_string(),
        (false, false) => format!("/{title_path}/"),
    }
}

/// Strip the leading `:` of a dynamic segment token (`:slug` -> `slug`).
pub fn pattern_param(pattern: &str) -> &str {
    pattern.trim_start_matches(':').trim_end_matches('/')
}
