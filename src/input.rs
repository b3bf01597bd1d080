use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::coerce::to_opt_string;
use crate::error::{Result, ScraperError};

/// What to scrape for one advertiser.
///
/// `api_payload` and `html_snapshot` allow offline runs from previously
/// captured data; otherwise the gallery is fetched over HTTP.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvertiserDescriptor {
    pub advertiser_id: Option<String>,
    pub start_url: Option<String>,
    pub html_snapshot: Option<String>,
    pub api_payload: Option<Value>,
}

impl AdvertiserDescriptor {
    /// Reads the known keys of a descriptor object. Scalar fields are coerced
    /// to text, so an id given as a number is kept; the API payload is taken
    /// as is. Whether the descriptor is usable is decided when it is scraped.
    pub fn from_value(raw: &Value) -> Self {
        Self {
            advertiser_id: to_opt_string(raw.get("advertiserId")),
            start_url: to_opt_string(raw.get("startUrl")),
            html_snapshot: to_opt_string(raw.get("htmlSnapshot")),
            api_payload: raw.get("apiPayload").filter(|p| !p.is_null()).cloned(),
        }
    }
}

/// Reads and normalizes the advertiser input file.
pub fn load_advertisers(path: &Path) -> Result<Vec<AdvertiserDescriptor>> {
    let content = fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&content)?;
    normalize_input_payload(payload)
}

/// Accepts `{"advertisers": [...]}`, a bare list, or a single advertiser object.
pub fn normalize_input_payload(payload: Value) -> Result<Vec<AdvertiserDescriptor>> {
    let advertisers = match payload {
        Value::Object(mut obj) if obj.contains_key("advertisers") => {
            match obj.remove("advertisers") {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => Vec::new(),
            }
        }
        Value::Array(items) => items,
        other => vec![other],
    };

    advertisers
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                return Err(ScraperError::InvalidInput(format!(
                    "advertiser at index {idx} must be a JSON object"
                )));
            }
            Ok(AdvertiserDescriptor::from_value(&item))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_wrapped_list() {
        let ads = normalize_input_payload(json!({
            "advertisers": [{"advertiserId": "AR1"}, {"startUrl": "https://x"}]
        }))
        .unwrap();
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].advertiser_id.as_deref(), Some("AR1"));
        assert_eq!(ads[1].start_url.as_deref(), Some("https://x"));
    }

    #[test]
    fn accepts_bare_list_and_single_object() {
        assert_eq!(normalize_input_payload(json!([{}, {}])).unwrap().len(), 2);
        let single = normalize_input_payload(json!({"advertiserId": "AR9"})).unwrap();
        assert_eq!(single[0].advertiser_id.as_deref(), Some("AR9"));
    }

    #[test]
    fn rejects_non_object_entries_by_index() {
        let err = normalize_input_payload(json!([{}, "AR2"])).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn numeric_advertiser_id_is_kept_as_text() {
        let ads = normalize_input_payload(json!({
            "advertisers": [
                {"advertiserId": 123, "htmlSnapshot": "<html></html>"},
                {"advertiserId": "AR2", "startUrl": "https://x"}
            ]
        }))
        .unwrap();
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].advertiser_id.as_deref(), Some("123"));
        assert_eq!(ads[1].advertiser_id.as_deref(), Some("AR2"));
    }

    #[test]
    fn odd_field_types_do_not_reject_other_advertisers() {
        let ads = normalize_input_payload(json!([
            {"advertiserId": "AR1", "startUrl": 42, "htmlSnapshot": ["not", "html"],
             "apiPayload": null},
            {"advertiserId": "AR2", "apiPayload": {"creatives": []}}
        ]))
        .unwrap();
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].start_url.as_deref(), Some("42"));
        assert_eq!(ads[0].api_payload, None);
        assert_eq!(ads[1].api_payload, Some(json!({"creatives": []})));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, r#"{"advertisers": [{"advertiserId": "AR1", "htmlSnapshot": "<html></html>"}]}"#).unwrap();
        let ads = load_advertisers(&path).unwrap();
        assert_eq!(ads[0].html_snapshot.as_deref(), Some("<html></html>"));
    }
}
