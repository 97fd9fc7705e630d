//! Rule settings: severities and security overrides.

use litho_carton::{lower_name, CompactString, FxHashMap};
use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;

/// Configured severity of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Off,
    Warn,
    Error,
}

impl RuleSeverity {
    #[inline]
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Security preset for typed attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecuritySystem {
    #[default]
    #[serde(rename = "off")]
    Off,
    ClosureSafeTypes,
}

/// Allow-lists of nominal type names per attribute.
///
/// A value bound to an overridden attribute must consist of allowed types
/// only. The keywords `string`, `number` and `boolean` admit primitives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityOverrides {
    /// Per tag, per attribute
    #[serde(default)]
    pub tags: FxHashMap<CompactString, FxHashMap<CompactString, Vec<CompactString>>>,
    /// Per attribute on any tag
    #[serde(default)]
    pub global: FxHashMap<CompactString, Vec<CompactString>>,
}

impl SecurityOverrides {
    /// The allow-list for an attribute on a tag. Tag entries win.
    pub fn lookup(&self, tag: &str, attribute: &str) -> Option<&[CompactString]> {
        let tag = lower_name(tag);
        let attribute = lower_name(attribute);
        self.tags
            .get(&tag)
            .and_then(|attrs| attrs.get(&attribute))
            .or_else(|| self.global.get(&attribute))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.global.is_empty()
    }

    /// The overrides a security system installs.
    pub fn preset(system: SecuritySystem) -> Self {
        match system {
            SecuritySystem::Off => Self::default(),
            SecuritySystem::ClosureSafeTypes => closure_safe_types(),
        }
    }

    /// Layer explicit overrides on top of `self`. Explicit entries win.
    pub fn overlay(mut self, explicit: &SecurityOverrides) -> Self {
        for (tag, attrs) in &explicit.tags {
            let entry = self.tags.entry(lower_name(tag)).or_default();
            for (attr, types) in attrs {
                entry.insert(lower_name(attr), types.clone());
            }
        }
        for (attr, types) in &explicit.global {
            self.global.insert(lower_name(attr), types.clone());
        }
        self
    }
}

fn list(names: &[&str]) -> Vec<CompactString> {
    names.iter().map(|n| CompactString::from(*n)).collect()
}

fn closure_safe_types() -> SecurityOverrides {
    let resource_url = list(&["TrustedResourceUrl"]);
    let url = list(&["SafeUrl", "TrustedResourceUrl"]);

    let mut tags: FxHashMap<CompactString, FxHashMap<CompactString, Vec<CompactString>>> =
        FxHashMap::default();
    for (tag, attr) in [
        ("iframe", "src"),
        ("script", "src"),
        ("embed", "src"),
        ("object", "data"),
    ] {
        tags.entry(tag.into())
            .or_default()
            .insert(attr.into(), resource_url.clone());
    }

    let mut global: FxHashMap<CompactString, Vec<CompactString>> = FxHashMap::default();
    for attr in [
        "href",
        "src",
        "action",
        "formaction",
        "srcset",
        "background",
        "cite",
        "poster",
    ] {
        global.insert(attr.into(), url.clone());
    }
    global.insert("style".into(), list(&["SafeStyle"]));

    SecurityOverrides { tags, global }
}

/// Everything rules read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    /// Use the strict severity of every rule
    pub strict: bool,
    /// Explicit severities by rule name
    pub rules: FxHashMap<CompactString, RuleSeverity>,
    /// Effective security overrides (preset plus explicit entries)
    pub security: SecurityOverrides,
    /// Largest edit distance for "did you mean" suggestions
    pub max_suggestion_distance: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            strict: false,
            rules: FxHashMap::default(),
            security: SecurityOverrides::default(),
            max_suggestion_distance: DEFAULT_SUGGESTION_DISTANCE,
        }
    }
}

/// Default fuzzy-match threshold.
pub const DEFAULT_SUGGESTION_DISTANCE: usize = 3;

impl RuleSettings {
    /// Effective severity of a rule, `None` when it is off.
    pub fn severity(&self, rule: &str, default: RuleSeverity, strict: RuleSeverity) -> Option<Severity> {
        let configured = self.rules.get(rule).copied().unwrap_or(if self.strict {
            strict
        } else {
            default
        });
        configured.to_severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        let overrides = SecurityOverrides::preset(SecuritySystem::ClosureSafeTypes);
        let iframe = overrides.lookup("IFRAME", "src").unwrap();
        assert_eq!(iframe, ["TrustedResourceUrl"]);
        let a = overrides.lookup("a", "href").unwrap();
        assert!(a.iter().any(|t| t == "SafeUrl"));
        assert!(!a.iter().any(|t| t == "string"));
        assert!(overrides.lookup("a", "title").is_none());
    }

    #[test]
    fn test_explicit_overrides_win() {
        let mut explicit = SecurityOverrides::default();
        explicit
            .global
            .insert("href".into(), vec!["string".into(), "SafeUrl".into()]);
        let overrides =
            SecurityOverrides::preset(SecuritySystem::ClosureSafeTypes).overlay(&explicit);
        assert_eq!(overrides.lookup("a", "href").unwrap().len(), 2);
    }

    #[test]
    fn test_severity_resolution() {
        let mut settings = RuleSettings::default();
        assert_eq!(
            settings.severity("no-unclosed-tag", RuleSeverity::Warn, RuleSeverity::Error),
            Some(Severity::Warning)
        );
        settings.strict = true;
        assert_eq!(
            settings.severity("no-unclosed-tag", RuleSeverity::Warn, RuleSeverity::Error),
            Some(Severity::Error)
        );
        settings
            .rules
            .insert("no-unclosed-tag".into(), RuleSeverity::Off);
        assert_eq!(
            settings.severity("no-unclosed-tag", RuleSeverity::Warn, RuleSeverity::Error),
            None
        );
    }

    #[test]
    fn test_deserialize_severity() {
        let parsed: FxHashMap<CompactString, RuleSeverity> =
            serde_json::from_str(r#"{ "no-unknown-tag-name": "off" }"#).unwrap();
        assert_eq!(parsed["no-unknown-tag-name"], RuleSeverity::Off);
    }
}
