//! Named URL patterns with forward resolution and reversing.
//!
//! Templates use `{lang}` for the language code, `{name}` for a single path
//! segment and `{*name}` for one or more segments:
//!
//! ```text
//! api:cms_page_detail_home   /api/{lang}/pages/
//! api:cms_page_detail        /api/{lang}/pages/{*path}/
//! news_detail                /{lang}/news/{slug}/
//! ```
//!
//! Patterns are matched in registration order; the first match wins.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::CoreError;
use crate::types::StringMap;
use crate::view::RouterView;

/// Keyword under which `{lang}` captures are reported.
pub const LANG_KWARG: &str = "lang";

const LANG_REGEX: &str = "[a-z]{2}(?:-[a-zA-Z0-9]+)?";

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Lang,
    Segment(String),
    Rest(String),
}

struct UrlPattern {
    name: String,
    parts: Vec<Part>,
    regex: Regex,
    view: Option<Arc<dyn RouterView>>,
}

/// Result of resolving a path.
#[derive(Clone)]
pub struct ResolvedRoute {
    pub name: String,
    pub kwargs: StringMap,
    pub view: Option<Arc<dyn RouterView>>,
}

impl ResolvedRoute {
    pub fn language(&self) -> Option<&str> {
        self.kwargs.get(LANG_KWARG).map(String::as_str)
    }
}

impl fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("name", &self.name)
            .field("kwargs", &self.kwargs)
            .field("has_view", &self.view.is_some())
            .finish()
    }
}

/// Ordered registry of named URL patterns.
#[derive(Default)]
pub struct UrlPatterns {
    patterns: Vec<UrlPattern>,
}

impl fmt::Debug for UrlPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(|p| &p.name))
            .finish()
    }
}

impl UrlPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern that no router view serves (API endpoints).
    pub fn add(&mut self, name: &str, template: &str) -> Result<&mut Self, CoreError> {
        self.push(name, template, None)
    }

    /// Register a pattern served by `view`.
    pub fn add_view(
        &mut self,
        name: &str,
        template: &str,
        view: Arc<dyn RouterView>,
    ) -> Result<&mut Self, CoreError> {
        self.push(name, template, Some(view))
    }

    fn push(
        &mut self,
        name: &str,
        template: &str,
        view: Option<Arc<dyn RouterView>>,
    ) -> Result<&mut Self, CoreError> {
        let parts = parse_template(template)?;
        let regex = compile(&parts)?;
        self.patterns.push(UrlPattern {
            name: name.to_string(),
            parts,
            regex,
            view,
        });
        Ok(self)
    }

    /// Resolve a path to the first matching pattern.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        self.patterns.iter().find_map(|pattern| {
            let captures = pattern.regex.captures(path)?;
            let kwargs = pattern
                .regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect();
            Some(ResolvedRoute {
                name: pattern.name.clone(),
                kwargs,
                view: pattern.view.clone(),
            })
        })
    }

    /// Name of the pattern `path` resolves to.
    pub fn route_name(&self, path: &str) -> Option<String> {
        self.resolve(path).map(|r| r.name)
    }

    /// Build the path of the named pattern.
    ///
    /// Values for `{*rest}` placeholders are trimmed of surrounding slashes.
    /// Unknown names and missing arguments are wiring mistakes and surface
    /// as [`CoreError::Configuration`].
    pub fn reverse(
        &self,
        name: &str,
        language: &str,
        kwargs: &StringMap,
    ) -> Result<String, CoreError> {
        let pattern = self
            .patterns
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CoreError::Configuration(format!("Reverse for '{name}' not found")))?;

        let mut url = String::new();
        for part in &pattern.parts {
            match part {
                Part::Literal(text) => url.push_str(text),
                Part::Lang => url.push_str(language),
                Part::Segment(key) | Part::Rest(key) => {
                    let value = kwargs.get(key).ok_or_else(|| {
                        CoreError::Configuration(format!(
                            "Reverse for '{name}' is missing argument '{key}'"
                        ))
                    })?;
                    match part {
                        Part::Rest(_) => url.push_str(value.trim_matches('/')),
                        _ => url.push_str(value),
                    }
                }
            }
        }
        Ok(url)
    }
}

fn parse_template(template: &str) -> Result<Vec<Part>, CoreError> {
    let mut parts = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        if start > 0 {
            parts.push(Part::Literal(rest[..start].to_string()));
        }
        let end = rest[start..].find('}').ok_or_else(|| {
            CoreError::Configuration(format!("Unclosed placeholder in URL template '{template}'"))
        })? + start;
        let key = &rest[start + 1..end];
        let part = match key {
            LANG_KWARG => Part::Lang,
            _ => match key.strip_prefix('*') {
                Some(name) => Part::Rest(name.to_string()),
                None => Part::Segment(key.to_string()),
            },
        };
        if matches!(&part, Part::Segment(k) | Part::Rest(k) if k.is_empty()) {
            return Err(CoreError::Configuration(format!(
                "Empty placeholder in URL template '{template}'"
            )));
        }
        parts.push(part);
        rest = &rest[end + 1..];
    }
    if !rest.is_empty() {
        parts.push(Part::Literal(rest.to_string()));
    }
    Ok(parts)
}

fn compile(parts: &[Part]) -> Result<Regex, CoreError> {
    let mut source = String::from("^");
    for part in parts {
        match part {
            Part::Literal(text) => source.push_str(&regex::escape(text)),
            Part::Lang => source.push_str(&format!("(?P<{LANG_KWARG}>{LANG_REGEX})")),
            Part::Segment(name) => source.push_str(&format!("(?P<{name}>[^/]+)")),
            Part::Rest(name) => source.push_str(&format!("(?P<{name}>.+)")),
        }
    }
    source.push('$');
    Regex::new(&source).map_err(|e| CoreError::Configuration(format!("Invalid URL pattern: {e}")))
}
