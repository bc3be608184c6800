//! Output formats for `kcl run`
//!
//! The compiler always emits YAML, possibly a stream of documents separated
//! by `---`. Each format converts that text:
//!
//! - `yaml.rs`: passthrough plus stream parsing shared by the others
//! - `json.rs`: 4-space indented JSON
//! - `toml.rs`: TOML, top-level mappings only
//! - `xml.rs`: XML under a `<root>` element

pub mod json;
pub mod toml;
pub mod xml;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use crate::error::{KclError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Toml,
    Xml,
}

impl FromStr for OutputFormat {
    type Err = KclError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "xml" => Ok(Self::Xml),
            _ => Err(KclError::InvalidOutputFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Xml => "xml",
        })
    }
}

/// Convert compiler YAML output into `format`
pub fn render(yaml_output: &str, format: OutputFormat, sort_keys: bool) -> Result<String> {
    if format == OutputFormat::Yaml {
        return Ok(yaml::passthrough(yaml_output));
    }

    let stream = yaml::is_stream(yaml_output);
    let mut docs = yaml::parse_stream(yaml_output)?;
    if sort_keys {
        docs = docs.into_iter().map(sorted).collect();
    }

    match format {
        OutputFormat::Json if stream => json::stream(&docs),
        OutputFormat::Json => json::single(first(&docs)),
        OutputFormat::Toml if stream => toml::stream(&docs),
        OutputFormat::Toml => toml::single(first(&docs)),
        OutputFormat::Xml if stream => Ok(xml::stream(&docs)),
        OutputFormat::Xml => Ok(xml::single(first(&docs))),
        OutputFormat::Yaml => Ok(yaml::passthrough(yaml_output)),
    }
}

fn first(docs: &[Value]) -> &Value {
    docs.first().unwrap_or(&Value::Null)
}

/// Recursively sort mapping keys
pub fn sorted(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| key_string(a).cmp(&key_string(b)));
            Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sorted(v)))
                    .collect::<Mapping>(),
            )
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(sorted).collect()),
        Value::Tagged(tagged) => sorted(tagged.value),
        other => other,
    }
}

/// Scalar rendering of a mapping key
pub(crate) fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
