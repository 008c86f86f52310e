//! Router settings: template registry and URL conventions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Frontend wiring of one content template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Name of the frontend component that renders this template.
    pub frontend_component_name: String,
    /// Shared fragments (navigation, footer, ...) the template always needs.
    #[serde(default)]
    pub partials: Vec<String>,
}

/// Settings consulted while building the route tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaSettings {
    /// Template identifier -> frontend wiring.
    #[serde(default)]
    pub templates: IndexMap<String, TemplateSettings>,
    /// Template used when a page's own template is not registered.
    pub default_template: String,
    /// Template reported for nodes whose URL cannot be resolved.
    pub error_404_template: String,
    /// Prefix page paths with the language code.
    #[serde(default = "default_true")]
    pub use_i18n_patterns: bool,
    /// Applications whose hooked page takes its fetch URL from the app view.
    #[serde(default)]
    pub apphooks_with_root_url: Vec<String>,
    /// Languages the site is served in. The first one is the default.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

impl SpaSettings {
    /// Frontend component for a template.
    pub fn component_for_template(&self, template: &str) -> Result<String, CoreError> {
        self.templates
            .get(template)
            .map(|t| t.frontend_component_name.clone())
            .ok_or_else(|| {
                CoreError::TemplateResolution(format!("No frontend component for '{template}'"))
            })
    }

    /// Frontend component of the default template.
    ///
    /// A default template missing from the registry is a wiring mistake,
    /// not a content problem.
    pub fn default_component(&self) -> Result<String, CoreError> {
        self.component_for_template(&self.default_template)
            .map_err(|_| {
                CoreError::Configuration(format!(
                    "Default template '{}' is not registered",
                    self.default_template
                ))
            })
    }

    /// Partial names declared by a template (empty for unknown templates).
    pub fn partials_for_template(&self, template: &str) -> &[String] {
        self.templates
            .get(template)
            .map(|t| t.partials.as_slice())
            .unwrap_or(&[])
    }

    /// The default language.
    pub fn default_language(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or("en")
    }

    /// Whether `language` is one of the configured languages.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}
