//! Best-effort coercions from untrusted JSON values into the scalar shapes the
//! domain model uses. None of these fail: a value that cannot be coerced
//! degrades to a default (`0`, `""`, `None`, `false`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::DATE_FORMATS;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Walks nested objects by key, returning `None` as soon as a step is missing
/// or not an object.
pub fn safe_get<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |cur, key| cur.as_object()?.get(*key))
}

/// Renders a scalar as text. `null` and absent values become empty strings;
/// nested structures are rendered as compact JSON.
pub fn to_string_or_empty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Like [`to_string_or_empty`] but keeps "absent" distinct from "empty".
pub fn to_opt_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        some => Some(to_string_or_empty(some)),
    }
}

/// Parses a count that may arrive as a number or a string such as `"1,234"`.
/// Anything that is not a non-negative integer becomes `0`.
pub fn to_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
                .unwrap_or(0)
        }),
        Some(Value::String(s)) => parse_count(s),
        Some(Value::Bool(b)) => u64::from(*b),
        _ => 0,
    }
}

/// Parses a comma-formatted count string; malformed text becomes `0`.
pub fn parse_count(text: &str) -> u64 {
    text.replace(',', "").trim().parse().unwrap_or(0)
}

/// Truthiness of a JSON value: `null`, `false`, `0`, and empty strings,
/// arrays or objects are false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Normalizes a gallery date to `YYYY-MM-DD` when one of the known layouts
/// matches; unknown layouts are passed through trimmed, blanks become `None`.
pub fn parse_date(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    if ISO_DATE.is_match(value) {
        return Some(value.to_string());
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    Some(value.to_string())
}

/// Iterates the elements of a JSON array, treating anything else as empty.
pub fn array_items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_get_walks_nested_objects() {
        let v = json!({"a": {"b": {"c": 3}}, "x": [1]});
        assert_eq!(safe_get(&v, &["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(safe_get(&v, &["a", "missing"]), None);
        assert_eq!(safe_get(&v, &["x", "0"]), None);
    }

    #[test]
    fn counts_accept_numbers_and_formatted_strings() {
        assert_eq!(to_count(Some(&json!(42))), 42);
        assert_eq!(to_count(Some(&json!("1,234"))), 1234);
        assert_eq!(to_count(Some(&json!(" 7 "))), 7);
        assert_eq!(to_count(Some(&json!(12.9))), 12);
    }

    #[test]
    fn counts_never_fail() {
        assert_eq!(to_count(Some(&json!("abc"))), 0);
        assert_eq!(to_count(Some(&Value::Null)), 0);
        assert_eq!(to_count(None), 0);
        assert_eq!(to_count(Some(&json!(-5))), 0);
        assert_eq!(to_count(Some(&json!("-5"))), 0);
        assert_eq!(to_count(Some(&json!({"n": 1}))), 0);
    }

    #[test]
    fn strings_render_scalars() {
        assert_eq!(to_string_or_empty(Some(&json!("x"))), "x");
        assert_eq!(to_string_or_empty(Some(&json!(5))), "5");
        assert_eq!(to_string_or_empty(Some(&Value::Null)), "");
        assert_eq!(to_string_or_empty(None), "");
        assert_eq!(to_opt_string(Some(&Value::Null)), None);
        assert_eq!(to_opt_string(Some(&json!(""))), Some(String::new()));
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn dates_are_normalized_to_iso() {
        assert_eq!(parse_date(Some("2024-05-17")), Some("2024-05-17".into()));
        assert_eq!(parse_date(Some(" 17-05-2024 ")), Some("2024-05-17".into()));
        assert_eq!(parse_date(Some("2024/05/17")), Some("2024-05-17".into()));
        assert_eq!(parse_date(Some("17/05/2024")), Some("2024-05-17".into()));
        assert_eq!(parse_date(Some("May 2024")), Some("May 2024".into()));
        assert_eq!(parse_date(Some("   ")), None);
        assert_eq!(parse_date(None), None);
    }
}
