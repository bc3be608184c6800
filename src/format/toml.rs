use serde_yaml::Value;

use crate::error::{KclError, Result};

use super::key_string;

const DOCUMENT_SEPARATOR: &str = "\n# --- Document separator ---\n\n";

/// TOML has no null, so null values are dropped from mappings and sequences
fn to_toml(value: &Value) -> Option<toml::Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(toml::Value::Boolean(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(toml::Value::Integer(i)),
            None => n.as_f64().map(toml::Value::Float),
        },
        Value::String(s) => Some(toml::Value::String(s.clone())),
        Value::Sequence(items) => Some(toml::Value::Array(
            items.iter().filter_map(to_toml).collect(),
        )),
        Value::Mapping(map) => Some(toml::Value::Table(
            map.iter()
                .filter_map(|(k, v)| Some((key_string(k), to_toml(v)?)))
                .collect(),
        )),
        Value::Tagged(tagged) => to_toml(&tagged.value),
    }
}

fn document(doc: &Value, index: usize) -> Result<String> {
    let Some(toml::Value::Table(table)) = to_toml(doc) else {
        return Err(KclError::FormatFailed {
            reason: format!("document {index} is not a map"),
        });
    };
    Ok(toml::to_string(&table)?)
}

pub fn single(doc: &Value) -> Result<String> {
    Ok(format!("{}\n", document(doc, 1)?))
}

/// Documents separated by a `# --- Document separator ---` comment
pub fn stream(docs: &[Value]) -> Result<String> {
    let rendered = docs
        .iter()
        .enumerate()
        .map(|(i, doc)| document(doc, i + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(DOCUMENT_SEPARATOR))
}
