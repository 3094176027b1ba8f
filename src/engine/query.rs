//! Query-string encoding for request bodies sent with non-body methods.

use serde_json::Value;
use url::Url;

/// Flattens a JSON value into `(key, value)` query pairs.
///
/// Objects become bracketed keys (`metadata[order]`), arrays repeat the
/// key with a `[]` suffix, and nulls are skipped. A non-object top-level
/// value produces no pairs.
#[must_use]
pub(crate) fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            push_value(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                push_value(pairs, key.clone(), item);
            }
        }
        Value::Object(map) => {
            for (sub, value) in map {
                push_value(pairs, format!("{key}[{sub}]"), value);
            }
        }
    }
}

/// Appends the flattened body and `expand[]` entries to the URL's query.
pub(crate) fn append(url: &mut Url, body: Option<&Value>, expand: &[String]) {
    let pairs = body.map(flatten).unwrap_or_default();
    if pairs.is_empty() && expand.is_empty() {
        return;
    }

    let mut query = url.query_pairs_mut();
    for (key, value) in &pairs {
        query.append_pair(key, value);
    }
    for field in expand {
        query.append_pair("expand[]", field);
    }
}
