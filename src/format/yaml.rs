use serde::Deserialize;
use serde_yaml::Value;

use crate::error::Result;

/// Compiler output unchanged, newline terminated
pub fn passthrough(yaml_output: &str) -> String {
    if yaml_output.ends_with('\n') {
        yaml_output.to_string()
    } else {
        format!("{yaml_output}\n")
    }
}

/// True when the output holds several documents separated by `---`
pub fn is_stream(yaml_output: &str) -> bool {
    yaml_output.contains("---\n")
}

/// Every document in the output; an empty output is a single null document
pub fn parse_stream(yaml_output: &str) -> Result<Vec<Value>> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml_output) {
        docs.push(Value::deserialize(document)?);
    }
    if docs.is_empty() {
        docs.push(Value::Null);
    }
    Ok(docs)
}
