//! Recursive serialization of structured values into query fragments.

use serde_json::Value;
use urlencoding::encode;

/// Flattens a structured value into `key=value` pairs joined by `&`.
///
/// Nested objects and arrays use bracket notation: `{"a": {"b": 1}}`
/// becomes `a%5Bb%5D=1` (`a[b]=1` with the key URL-encoded). Array
/// elements are keyed by index. Both key and value are URL-encoded at the
/// leaves. Null is a leaf rendering as `null`, not a container to descend
/// into. A scalar at the top level has no key to pair with and yields an
/// empty string.
///
/// Object keys are emitted in insertion order.
///
/// # Example
///
/// ```rust
/// use portico::query::serialize;
/// use serde_json::json;
///
/// assert_eq!(serialize(&json!({"a": 1, "b": 2}), None), "a=1&b=2");
/// assert_eq!(serialize(&json!({"a": {"b": 1}}), None), "a%5Bb%5D=1");
/// ```
#[must_use]
pub fn serialize(value: &Value, prefix: Option<&str>) -> String {
    let mut pairs = Vec::new();

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                pairs.push(entry(child, &child_key(prefix, key)));
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                pairs.push(entry(child, &child_key(prefix, &index.to_string())));
            }
        }
        _ => {}
    }

    pairs.join("&")
}

fn child_key(prefix: Option<&str>, key: &str) -> String {
    prefix.map_or_else(|| key.to_string(), |p| format!("{p}[{key}]"))
}

fn entry(value: &Value, key: &str) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => serialize(value, Some(key)),
        leaf => format!("{}={}", encode(key), encode(&scalar(leaf))),
    }
}

/// Renders a leaf value the way it appears on the wire: strings unquoted,
/// numbers and booleans verbatim, null as `null`.
pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
