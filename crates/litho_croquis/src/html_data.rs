//! External html-data descriptor files.
//!
//! ```json
//! {
//!   "version": 1,
//!   "tags": [{ "name": "x-button", "attributes": [{ "name": "size", "values": [{ "name": "small" }] }] }],
//!   "globalAttributes": [{ "name": "x-theme", "valueSet": "theme" }],
//!   "valueSets": [{ "name": "theme", "values": [{ "name": "dark" }, { "name": "light" }] }]
//! }
//! ```

use std::path::{Path, PathBuf};

use litho_canon::SimpleType;
use litho_carton::{CompactString, FxHashMap};
use serde::Deserialize;

use crate::descriptor::{MemberDescriptor, TagDescriptor, TypeCell};
use crate::layer::{GlobalBucket, HtmlCollection};

/// The only supported schema version.
pub const HTML_DATA_VERSION: u32 = 1;

/// Value set name marking a boolean attribute.
const BOOLEAN_VALUE_SET: &str = "v";

/// Error type for descriptor file loading.
#[derive(Debug, thiserror::Error)]
pub enum HtmlDataError {
    /// IO error.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version other than 1.
    #[error("unsupported html data version {0}")]
    UnsupportedVersion(u32),
}

/// Result type for descriptor file loading.
pub type HtmlDataResult<T> = Result<T, HtmlDataError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HtmlData {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    tags: Vec<HtmlDataTag>,
    #[serde(default)]
    global_attributes: Vec<HtmlDataAttribute>,
    #[serde(default)]
    value_sets: Vec<HtmlDataValueSet>,
}

fn default_version() -> u32 {
    HTML_DATA_VERSION
}

#[derive(Debug, Deserialize)]
struct HtmlDataTag {
    name: CompactString,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    attributes: Vec<HtmlDataAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HtmlDataAttribute {
    name: CompactString,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    value_set: Option<CompactString>,
    #[serde(default)]
    values: Option<Vec<HtmlDataValue>>,
}

#[derive(Debug, Deserialize)]
struct HtmlDataValue {
    name: CompactString,
}

#[derive(Debug, Deserialize)]
struct HtmlDataValueSet {
    name: CompactString,
    #[serde(default)]
    values: Vec<HtmlDataValue>,
}

/// Descriptions may be plain strings or markup content objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(CompactString),
    Markup { value: CompactString },
}

impl Description {
    fn into_text(self) -> CompactString {
        match self {
            Description::Text(text) | Description::Markup { value: text } => text,
        }
    }
}

/// Parse descriptor JSON text.
pub fn parse_html_data(text: &str) -> HtmlDataResult<HtmlCollection> {
    let data: HtmlData = serde_json::from_str(text)?;
    convert(data)
}

/// Convert an inline descriptor object.
pub fn from_value(value: serde_json::Value) -> HtmlDataResult<HtmlCollection> {
    let data: HtmlData = serde_json::from_value(value)?;
    convert(data)
}

/// Read and parse a descriptor file.
pub fn load_html_data(path: &Path) -> HtmlDataResult<HtmlCollection> {
    let text = std::fs::read_to_string(path).map_err(|source| HtmlDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection = parse_html_data(&text)?;
    tracing::debug!(
        path = %path.display(),
        tags = collection.tags.len(),
        "loaded html data"
    );
    Ok(collection)
}

fn convert(data: HtmlData) -> HtmlDataResult<HtmlCollection> {
    if data.version != HTML_DATA_VERSION {
        return Err(HtmlDataError::UnsupportedVersion(data.version));
    }

    let value_sets: FxHashMap<CompactString, Vec<CompactString>> = data
        .value_sets
        .into_iter()
        .map(|set| (set.name, set.values.into_iter().map(|v| v.name).collect()))
        .collect();

    let tags = data
        .tags
        .into_iter()
        .map(|tag| {
            let mut descriptor = TagDescriptor::new(tag.name);
            descriptor.description = tag.description.map(Description::into_text);
            descriptor.attributes = tag
                .attributes
                .into_iter()
                .map(|a| attribute(a, &value_sets))
                .collect();
            descriptor
        })
        .collect();

    let global = GlobalBucket {
        attributes: data
            .global_attributes
            .into_iter()
            .map(|a| attribute(a, &value_sets))
            .collect(),
        ..Default::default()
    };

    Ok(HtmlCollection { tags, global })
}

fn attribute(
    attribute: HtmlDataAttribute,
    value_sets: &FxHashMap<CompactString, Vec<CompactString>>,
) -> MemberDescriptor {
    let ty = match (&attribute.value_set, attribute.values) {
        (Some(set), _) if set == BOOLEAN_VALUE_SET => TypeCell::fixed(SimpleType::Boolean),
        (_, Some(values)) if !values.is_empty() => {
            TypeCell::values(values.into_iter().map(|v| v.name).collect())
        }
        (Some(set), _) => match value_sets.get(set) {
            Some(values) if !values.is_empty() => TypeCell::values(values.clone()),
            _ => TypeCell::fixed(SimpleType::String),
        },
        _ => TypeCell::fixed(SimpleType::String),
    };

    let mut descriptor = MemberDescriptor::new(attribute.name, ty);
    descriptor.description = attribute.description.map(Description::into_text);
    descriptor
}
