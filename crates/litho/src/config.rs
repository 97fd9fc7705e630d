//! Configuration file loading for litho.
//!
//! Reads `litho.config.json` from a project directory. Every field is
//! optional; a missing or malformed file yields the defaults.

use std::path::{Path, PathBuf};

use litho_carton::{CompactString, FxHashMap};
use litho_croquis::html_data::{from_value, load_html_data};
use litho_croquis::{
    AttributeDescriptor, EventDescriptor, GlobalBucket, HtmlCollection, TagDescriptor, TypeCell,
};
use litho_patina::{
    RuleSettings, RuleSeverity, SecurityOverrides, SecuritySystem, DEFAULT_SUGGESTION_DISTANCE,
};
use litho_stencil::LiteralTags;
use serde::{Deserialize, Serialize};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "litho.config.json";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// An external html-data source: a file path or the data itself.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HtmlDataSource {
    Path(PathBuf),
    Inline(serde_json::Value),
}

/// Top-level litho configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LithoConfig {
    /// Use the strict severity preset.
    pub strict: bool,

    /// Severity per rule name (`"off"`, `"warn"` or `"error"`).
    pub rules: FxHashMap<CompactString, RuleSeverity>,

    /// Tag names known everywhere, typed `any`.
    pub global_tags: Vec<CompactString>,
    pub global_attributes: Vec<CompactString>,
    pub global_events: Vec<CompactString>,

    /// External html-data descriptor files.
    pub custom_html_data: Vec<HtmlDataSource>,

    /// Template tags whose literals are markup.
    pub html_template_tags: Vec<CompactString>,
    /// Template tags whose literals are stylesheets.
    pub css_template_tags: Vec<CompactString>,

    pub security_system: SecuritySystem,
    /// Explicit allow-lists, layered over the security system's preset.
    pub security_overrides: SecurityOverrides,

    /// Largest edit distance for "did you mean" suggestions.
    pub max_suggestion_distance: usize,
}

impl Default for LithoConfig {
    fn default() -> Self {
        let tags = LiteralTags::default();
        Self {
            strict: false,
            rules: FxHashMap::default(),
            global_tags: Vec::new(),
            global_attributes: Vec::new(),
            global_events: Vec::new(),
            custom_html_data: Vec::new(),
            html_template_tags: tags.markup,
            css_template_tags: tags.stylesheet,
            security_system: SecuritySystem::default(),
            security_overrides: SecurityOverrides::default(),
            max_suggestion_distance: DEFAULT_SUGGESTION_DISTANCE,
        }
    }
}

impl LithoConfig {
    /// Settings handed to the rule engine.
    pub fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            strict: self.strict,
            rules: self.rules.clone(),
            security: SecurityOverrides::preset(self.security_system)
                .overlay(&self.security_overrides),
            max_suggestion_distance: self.max_suggestion_distance,
        }
    }

    pub fn literal_tags(&self) -> LiteralTags {
        LiteralTags {
            markup: self.html_template_tags.clone(),
            stylesheet: self.css_template_tags.clone(),
        }
    }

    /// The UserConfig knowledge layer.
    ///
    /// Relative html-data paths resolve against `base_dir`. Descriptor files
    /// that cannot be loaded are logged and skipped.
    pub fn user_collection(&self, base_dir: Option<&Path>) -> HtmlCollection {
        let mut collection = HtmlCollection {
            tags: self
                .global_tags
                .iter()
                .map(|name| TagDescriptor::new(name.clone()))
                .collect(),
            global: GlobalBucket {
                attributes: self
                    .global_attributes
                    .iter()
                    .map(|name| AttributeDescriptor::new(name.clone(), TypeCell::any()))
                    .collect(),
                events: self
                    .global_events
                    .iter()
                    .map(|name| EventDescriptor::new(name.clone(), TypeCell::any()))
                    .collect(),
                ..Default::default()
            },
        };

        for source in &self.custom_html_data {
            let loaded = match source {
                HtmlDataSource::Path(path) => {
                    let path = match base_dir {
                        Some(base) if path.is_relative() => base.join(path),
                        _ => path.clone(),
                    };
                    load_html_data(&path).map_err(|e| (path.display().to_string(), e))
                }
                HtmlDataSource::Inline(value) => {
                    from_value(value.clone()).map_err(|e| ("<inline>".to_string(), e))
                }
            };
            match loaded {
                Ok(data) => collection.extend(data),
                Err((origin, error)) => {
                    tracing::warn!(%origin, %error, "skipping html data");
                }
            }
        }

        collection
    }
}

/// Read and parse a configuration file.
pub fn read_config(path: &Path) -> Result<LithoConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `litho.config.json` from the given directory.
pub fn load_config(dir: &Path) -> LithoConfig {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return LithoConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(%error, "using default configuration");
            LithoConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litho_patina::Severity;

    #[test]
    fn test_defaults() {
        let config: LithoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LithoConfig::default());
        assert_eq!(config.html_template_tags, ["html", "svg", "raw"]);
        assert_eq!(config.css_template_tags, ["css"]);
        assert_eq!(config.max_suggestion_distance, 3);
    }

    #[test]
    fn test_parse_full_config() {
        let config: LithoConfig = serde_json::from_str(
            r#"{
                "strict": true,
                "rules": { "no-unknown-tag-name": "off", "no-missing-import": "error" },
                "globalAttributes": ["x-theme"],
                "htmlTemplateTags": ["html", "template"],
                "securitySystem": "ClosureSafeTypes",
                "securityOverrides": { "global": { "href": ["string"] } },
                "maxSuggestionDistance": 2
            }"#,
        )
        .unwrap();

        let settings = config.rule_settings();
        assert!(settings.strict);
        assert_eq!(
            settings.severity("no-missing-import", RuleSeverity::Off, RuleSeverity::Warn),
            Some(Severity::Error)
        );
        assert_eq!(
            settings.security.lookup("a", "href").unwrap(),
            [CompactString::from("string")]
        );
        assert_eq!(
            settings.security.lookup("iframe", "src").unwrap(),
            [CompactString::from("TrustedResourceUrl")]
        );
        assert!(config.literal_tags().dialect_of("template").is_some());
        assert_eq!(settings.max_suggestion_distance, 2);
    }

    #[test]
    fn test_user_collection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("data.json"),
            r#"{ "version": 1, "tags": [{ "name": "x-button", "attributes": [{ "name": "size" }] }] }"#,
        )
        .unwrap();
        let config: LithoConfig = serde_json::from_str(
            r#"{
                "globalTags": ["x-any"],
                "globalEvents": ["my-event"],
                "customHtmlData": [
                    "data.json",
                    "missing.json",
                    { "version": 1, "globalAttributes": [{ "name": "x-theme" }] },
                    { "version": 2 }
                ]
            }"#,
        )
        .unwrap();

        let collection = config.user_collection(Some(dir.path()));
        let tags: Vec<&str> = collection.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, ["x-any", "x-button"]);
        assert_eq!(collection.global.attributes.len(), 1);
        assert_eq!(collection.global.events.len(), 1);
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()), LithoConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "strict": true }"#).unwrap();
        assert!(load_config(dir.path()).strict);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()), LithoConfig::default());
        assert!(matches!(
            read_config(&dir.path().join(CONFIG_FILE_NAME)),
            Err(ConfigError::Json { .. })
        ));
    }
}
