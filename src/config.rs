//! Filter configuration.

use indexmap::IndexMap;
use serde_yaml::Value as YamlValue;
use thmenv_ast::MetaValue;

use crate::registrar::DEFAULT_METADATA_KEY;
use crate::utils::error::FilterResult;

#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Metadata entry holding the environment declarations.
    pub metadata_key: String,
    /// Declarations used when the document carries none of its own.
    pub fallback_environments: Option<MetaValue>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            fallback_environments: None,
        }
    }
}

impl FilterOptions {
    pub fn with_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.metadata_key = key.into();
        self
    }

    pub fn with_fallback_environments(mut self, environments: MetaValue) -> Self {
        self.fallback_environments = Some(environments);
        self
    }
}

/// Parse environment declarations from YAML.
///
/// Accepts either a bare list of declarations or a mapping that holds the
/// list under `metadata_key` (the same shape as a document's front matter).
pub fn environments_from_yaml(text: &str, metadata_key: &str) -> FilterResult<MetaValue> {
    let value: YamlValue = serde_yaml::from_str(text)?;
    let section = match value {
        YamlValue::Mapping(mut map) => match map.remove(metadata_key) {
            Some(inner) => inner,
            None => YamlValue::Mapping(map),
        },
        other => other,
    };
    Ok(yaml_to_meta(section))
}

fn yaml_to_meta(value: YamlValue) -> MetaValue {
    match value {
        YamlValue::Null => MetaValue::MetaString(String::new()),
        YamlValue::Bool(b) => MetaValue::MetaBool(b),
        YamlValue::Number(n) => MetaValue::MetaString(n.to_string()),
        YamlValue::String(s) => MetaValue::MetaString(s),
        YamlValue::Sequence(items) => {
            MetaValue::MetaList(items.into_iter().map(yaml_to_meta).collect())
        }
        YamlValue::Mapping(map) => {
            let mut out = IndexMap::new();
            for (key, value) in map {
                let key = match key {
                    YamlValue::String(s) => s,
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    _ => continue,
                };
                out.insert(key, yaml_to_meta(value));
            }
            MetaValue::MetaMap(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_meta(tagged.value),
    }
}
