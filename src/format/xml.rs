use serde_yaml::Value;

use super::key_string;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const ITEM: &str = "item";

/// `<root>...</root>` for one document
fn root(doc: &Value) -> String {
    let mut out = String::from("<root>");
    encode(&mut out, doc);
    out.push_str("</root>");
    out
}

pub fn single(doc: &Value) -> String {
    format!("{HEADER}{}\n", root(doc))
}

/// One `<root>` per document inside `<results>`
pub fn stream(docs: &[Value]) -> String {
    let mut out = format!("{HEADER}<results>\n");
    for doc in docs {
        out.push_str("  ");
        out.push_str(&root(doc));
        out.push('\n');
    }
    out.push_str("</results>\n");
    out
}

fn encode(out: &mut String, value: &Value) {
    match value {
        Value::Mapping(map) => {
            for (key, value) in map {
                element(out, &key_string(key), value);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                element(out, ITEM, item);
            }
        }
        Value::String(s) => out.push_str(&escape(s)),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(&b.to_string()),
        Value::Null => {}
        Value::Tagged(tagged) => encode(out, &tagged.value),
    }
}

fn element(out: &mut String, name: &str, value: &Value) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    encode(out, value);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            c => escaped.push(c),
        }
    }
    escaped
}
