//! Dotted-path resolution and scalar coercion over JSON records.

use serde_json::Value as JsonValue;

/// Resolve a dotted path (`"address.city"`) inside a record.
///
/// Object keys are matched literally; array segments may be numeric indices.
/// A missing segment or an explicit `null` terminal both resolve to `None`.
pub fn resolve_path<'a>(record: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Coerce a scalar JSON value into the string form comparators consume.
///
/// Strings pass through, numbers and booleans stringify, and composite
/// values (objects, arrays) are treated as missing.
pub fn value_to_string(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Missing-value test used for indicator features: absent, `null`, or an
/// empty/whitespace string.
pub fn is_missing(value: Option<&JsonValue>) -> bool {
    match value {
        None => true,
        Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Numeric view of a value: JSON numbers directly, numeric strings parsed.
pub fn value_to_f64(value: Option<&JsonValue>) -> Option<f64> {
    match value? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_paths() {
        let record = json!({"address": {"city": "Oslo", "lines": ["a", "b"]}});
        assert_eq!(
            resolve_path(&record, "address.city"),
            Some(&json!("Oslo"))
        );
        assert_eq!(resolve_path(&record, "address.lines.1"), Some(&json!("b")));
        assert_eq!(resolve_path(&record, "address.zip"), None);
        assert_eq!(resolve_path(&record, "address.city.extra"), None);
    }

    #[test]
    fn null_terminal_is_missing() {
        let record = json!({"phone": null});
        assert_eq!(resolve_path(&record, "phone"), None);
    }

    #[test]
    fn scalar_coercion() {
        assert_eq!(value_to_string(Some(&json!("x"))), Some("x".into()));
        assert_eq!(value_to_string(Some(&json!(42))), Some("42".into()));
        assert_eq!(value_to_string(Some(&json!(true))), Some("true".into()));
        assert_eq!(value_to_string(Some(&json!({"a": 1}))), None);
        assert_eq!(value_to_string(None), None);
    }

    #[test]
    fn missing_test_covers_empty_strings() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!("   "))));
        assert!(!is_missing(Some(&json!("x"))));
        assert!(!is_missing(Some(&json!(0))));
    }

    #[test]
    fn numeric_view_parses_strings() {
        assert_eq!(value_to_f64(Some(&json!(1.5))), Some(1.5));
        assert_eq!(value_to_f64(Some(&json!("2.5"))), Some(2.5));
        assert_eq!(value_to_f64(Some(&json!("n/a"))), None);
    }
}
