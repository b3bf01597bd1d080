use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce::{array_items, to_opt_string, to_string_or_empty};
use crate::domain::flatten::{flatten_ad, FlatRow};
use crate::domain::region::{parse_region_stats, RegionStat};
use crate::domain::targeting::TargetingInfo;
use crate::error::{Result, ScraperError};

/// One creative asset / call-to-action variant of an ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdVariation {
    pub click_url: Option<String>,
    pub cta: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl AdVariation {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            click_url: to_opt_string(raw.get("clickUrl")),
            cta: to_opt_string(raw.get("cta")),
            description: to_opt_string(raw.get("description")),
            image_url: to_opt_string(raw.get("imageUrl")),
        }
    }
}

/// A normalized creative with its aggregated serving statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    pub ad_library_url: String,
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub creative_id: String,
    pub format: String,
    pub first_shown: String,
    pub last_shown: String,
    pub preview_url: Option<String>,
    pub start_url: Option<String>,
    pub region_stats: Vec<RegionStat>,
    pub targeting: Option<TargetingInfo>,
    pub variations: Vec<AdVariation>,
}

impl AdRecord {
    /// Builds a record from one raw ad dictionary. Individual fields never
    /// fail; only a payload that is not an object at all is rejected.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let obj = raw.as_object().ok_or_else(|| {
            ScraperError::MalformedRecord(format!("expected an object, got {}", kind_of(raw)))
        })?;

        Ok(Self {
            ad_library_url: to_string_or_empty(obj.get("adLibraryUrl")),
            advertiser_id: to_string_or_empty(obj.get("advertiserId")),
            advertiser_name: to_string_or_empty(obj.get("advertiserName")),
            creative_id: to_string_or_empty(obj.get("creativeId")),
            format: to_string_or_empty(obj.get("format")),
            first_shown: to_string_or_empty(obj.get("firstShown")),
            last_shown: to_string_or_empty(obj.get("lastShown")),
            preview_url: to_opt_string(obj.get("previewUrl")),
            start_url: to_opt_string(obj.get("startUrl")),
            region_stats: parse_region_stats(obj.get("regionStats")),
            targeting: TargetingInfo::from_value(obj.get("targeting")),
            variations: array_items(obj.get("variations"))
                .filter(|v| v.is_object())
                .map(AdVariation::from_value)
                .collect(),
        })
    }

    /// Expands this ad into flat rows, one per region × surface × variation.
    pub fn to_flat_rows(&self) -> Vec<FlatRow> {
        flatten_ad(self)
    }
}

/// Converts raw ad dictionaries into records. A record that cannot be built is
/// logged and skipped; the rest of the batch is still processed.
pub fn parse_ads(raw_ads: &[Value]) -> Vec<AdRecord> {
    let mut parsed = Vec::with_capacity(raw_ads.len());
    for (idx, raw) in raw_ads.iter().enumerate() {
        match AdRecord::from_raw(raw) {
            Ok(ad) => parsed.push(ad),
            Err(e) => warn!("Failed to parse ad at index {}: {}", idx, e),
        }
    }
    debug!("Parsed {}/{} ad record(s)", parsed.len(), raw_ads.len());
    parsed
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::impressions::ImpressionRange;
    use serde_json::json;

    fn sample_raw() -> Value {
        json!({
            "adLibraryUrl": "https://adstransparency.google.com/advertiser/AR1/creative/CR1",
            "advertiserId": "AR1",
            "advertiserName": "Acme",
            "creativeId": "CR1",
            "format": "IMAGE",
            "firstShown": "2023-07-04",
            "lastShown": "2024-05-17",
            "previewUrl": "https://example.com/preview.png",
            "regionStats": [
                {"regionCode": "US", "regionName": "United States",
                 "impressions": {"lowerBound": 100, "upperBound": 200},
                 "surfaceServingStats": [
                     {"surfaceCode": "SEARCH", "surfaceName": "Search",
                      "impressions": {"lowerBound": 10, "upperBound": 20}}
                 ]}
            ],
            "targeting": {"targetingCategory": {"geography": {"US": true}}},
            "variations": [{"clickUrl": "https://acme.example", "cta": "Buy"}]
        })
    }

    #[test]
    fn builds_record_from_raw_dictionary() {
        let ad = AdRecord::from_raw(&sample_raw()).unwrap();
        assert_eq!(ad.advertiser_name, "Acme");
        assert_eq!(ad.start_url, None);
        assert_eq!(ad.region_stats.len(), 1);
        assert_eq!(ad.region_stats[0].impressions, ImpressionRange::new(100, 200));
        assert_eq!(ad.region_stats[0].surfaces[0].surface_code, "SEARCH");
        assert_eq!(ad.variations[0].cta.as_deref(), Some("Buy"));
        assert_eq!(ad.variations[0].image_url, None);
        assert!(ad.targeting.is_some());
    }

    #[test]
    fn empty_object_gives_empty_record() {
        let ad = AdRecord::from_raw(&json!({})).unwrap();
        assert_eq!(ad, AdRecord::default());
    }

    #[test]
    fn non_object_record_is_rejected() {
        assert!(matches!(
            AdRecord::from_raw(&json!("oops")),
            Err(ScraperError::MalformedRecord(_))
        ));
    }

    #[test]
    fn parse_ads_skips_bad_records_and_continues() {
        let raws = vec![sample_raw(), json!(17), json!({"creativeId": "CR2"})];
        let ads = parse_ads(&raws);
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].creative_id, "CR1");
        assert_eq!(ads[1].creative_id, "CR2");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let ad = AdRecord::from_raw(&sample_raw()).unwrap();
        let v = serde_json::to_value(&ad).unwrap();
        assert_eq!(v["adLibraryUrl"], json!(ad.ad_library_url));
        assert_eq!(v["regionStats"][0]["surfaceServingStats"][0]["surfaceCode"], json!("SEARCH"));
        assert_eq!(v["regionStats"][0]["impressions"]["upperBound"], json!(200));
        assert_eq!(v["targeting"]["geography"]["US"], json!(true));
    }
}
