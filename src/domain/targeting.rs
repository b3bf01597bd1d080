use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::coerce::{is_truthy, safe_get};

/// Category code to "is this category targeted".
pub type CategoryFlags = BTreeMap<String, bool>;

/// Targeting categories of an ad, normalized to boolean flags per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingInfo {
    pub demographics: CategoryFlags,
    pub geography: CategoryFlags,
    pub contextual: CategoryFlags,
    pub advertiser_list: CategoryFlags,
}

impl TargetingInfo {
    /// Normalizes a raw `{targetingCategory: {...}}` structure.
    ///
    /// Returns `None` when the input is absent or falsy. Every category that is
    /// missing or not a mapping comes out empty.
    pub fn from_value(raw: Option<&Value>) -> Option<Self> {
        let raw = raw.filter(|v| is_truthy(v))?;
        let category = |name: &str| bool_map(safe_get(raw, &["targetingCategory", name]));
        Some(Self {
            demographics: category("demographics"),
            geography: category("geography"),
            contextual: category("contextual"),
            advertiser_list: category("advertiserList"),
        })
    }

    /// Comma-joined, sorted codes flagged true in each category, in the order
    /// demographics, geography, contextual, advertiser list.
    pub fn active_codes(&self) -> [String; 4] {
        [
            join_active(&self.demographics),
            join_active(&self.geography),
            join_active(&self.contextual),
            join_active(&self.advertiser_list),
        ]
    }
}

fn bool_map(raw: Option<&Value>) -> CategoryFlags {
    raw.and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(code, flag)| (code.clone(), is_truthy(flag)))
                .collect()
        })
        .unwrap_or_default()
}

// BTreeMap iteration is already sorted by code.
fn join_active(flags: &CategoryFlags) -> String {
    flags
        .iter()
        .filter(|(_, active)| **active)
        .map(|(code, _)| code.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
