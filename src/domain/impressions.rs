use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Add, AddAssign};

use crate::coerce::{parse_count, to_count};

/// Estimated impression count, reported by the gallery as a range.
///
/// Both bounds are non-negative. Adding two ranges sums each bound on its own;
/// `lower_bound <= upper_bound` is not enforced, so inverted upstream data stays
/// inverted after a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpressionRange {
    pub lower_bound: u64,
    pub upper_bound: u64,
}

impl ImpressionRange {
    pub fn new(lower_bound: u64, upper_bound: u64) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Reads a `{lowerBound, upperBound}` mapping. Each bound that is missing or
    /// not numeric becomes `0`; a missing or non-mapping value yields `(0, 0)`.
    pub fn from_value(raw: Option<&Value>) -> Self {
        match raw.and_then(Value::as_object) {
            Some(obj) => Self::new(
                to_count(obj.get("lowerBound")),
                to_count(obj.get("upperBound")),
            ),
            None => Self::default(),
        }
    }

    /// Reads a pair of optional strings such as HTML attributes (`"1,234"`).
    pub fn from_strs(lower: Option<&str>, upper: Option<&str>) -> Self {
        Self::new(
            lower.map(parse_count).unwrap_or(0),
            upper.map(parse_count).unwrap_or(0),
        )
    }
}

impl Add for ImpressionRange {
    type Output = ImpressionRange;

    fn add(self, other: ImpressionRange) -> ImpressionRange {
        ImpressionRange {
            lower_bound: self.lower_bound.saturating_add(other.lower_bound),
            upper_bound: self.upper_bound.saturating_add(other.upper_bound),
        }
    }
}

impl AddAssign for ImpressionRange {
    fn add_assign(&mut self, other: ImpressionRange) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_mixed_scalar_bounds() {
        let raw = json!({"lowerBound": "100", "upperBound": 200});
        assert_eq!(ImpressionRange::from_value(Some(&raw)), ImpressionRange::new(100, 200));
    }

    #[test]
    fn malformed_bounds_become_zero() {
        let raw = json!({"lowerBound": "abc", "upperBound": null});
        assert_eq!(ImpressionRange::from_value(Some(&raw)), ImpressionRange::new(0, 0));

        let raw = json!({"lowerBound": "abc", "upperBound": "9"});
        assert_eq!(ImpressionRange::from_value(Some(&raw)), ImpressionRange::new(0, 9));
    }

    #[test]
    fn missing_or_non_mapping_is_zero() {
        assert_eq!(ImpressionRange::from_value(None), ImpressionRange::default());
        assert_eq!(ImpressionRange::from_value(Some(&json!("10"))), ImpressionRange::default());
        assert_eq!(ImpressionRange::from_value(Some(&json!({}))), ImpressionRange::default());
    }

    #[test]
    fn string_pairs_accept_thousands_separators() {
        assert_eq!(
            ImpressionRange::from_strs(Some("1,234"), Some(" 5,000 ")),
            ImpressionRange::new(1234, 5000)
        );
        assert_eq!(ImpressionRange::from_strs(None, Some("x")), ImpressionRange::default());
    }

    #[test]
    fn addition_is_bound_wise_and_keeps_inversions() {
        let mut total = ImpressionRange::new(10, 5);
        total += ImpressionRange::new(1, 2);
        assert_eq!(total, ImpressionRange::new(11, 7));
        assert_eq!(
            ImpressionRange::new(100, 200) + ImpressionRange::new(50, 75),
            ImpressionRange::new(150, 275)
        );
    }
}
