use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_yaml::Value;

use crate::error::Result;

fn to_json(doc: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn single(doc: &Value) -> Result<String> {
    Ok(format!("{}\n", to_json(doc)?))
}

/// Documents joined by `,\n`
pub fn stream(docs: &[Value]) -> Result<String> {
    let rendered = docs.iter().map(to_json).collect::<Result<Vec<_>>>()?;
    Ok(format!("{}\n", rendered.join(",\n")))
}
