use serde_json::{json, Value};
use tracing::{debug, info};

use super::{Parser, RawAd};
use crate::coerce::{array_items, parse_date, safe_get, to_opt_string, to_string_or_empty};
use crate::constants::ad_library_url;
use crate::domain::ImpressionRange;
use crate::error::Result;

/// Parses a structured `{"creatives": [...]}` payload from a cached or
/// internal API export.
pub struct ApiPayloadParser {
    pub advertiser_id: String,
    pub start_url: Option<String>,
}

impl ApiPayloadParser {
    pub fn new(advertiser_id: String, start_url: Option<String>) -> Self {
        Self {
            advertiser_id,
            start_url,
        }
    }

    pub fn parse_value(&self, payload: &Value) -> Vec<RawAd> {
        let creatives = safe_get(payload, &["creatives"]);
        let ads: Vec<RawAd> = array_items(creatives)
            .filter_map(|c| self.parse_creative(c))
            .collect();
        info!("Parsed {} creative(s) from API payload.", ads.len());
        ads
    }

    fn parse_creative(&self, creative: &Value) -> Option<RawAd> {
        let creative_id = to_string_or_empty(creative.get("creativeId"));
        if creative_id.is_empty() {
            debug!("Skipping creative without creativeId");
            return None;
        }

        let region_stats: Vec<Value> = array_items(creative.get("regionStats"))
            .filter(|r| r.is_object())
            .map(|r| {
                let code = to_string_or_empty(r.get("regionCode"));
                let surfaces: Vec<Value> = array_items(r.get("surfaceServingStats"))
                    .filter(|s| s.is_object())
                    .map(|s| {
                        let s_code = to_string_or_empty(s.get("surfaceCode"));
                        json!({
                            "surfaceName": name_or_code(s.get("surfaceName"), &s_code),
                            "surfaceCode": s_code,
                            "impressions": impressions(s.get("impressions")),
                        })
                    })
                    .collect();
                json!({
                    "regionName": name_or_code(r.get("regionName"), &code),
                    "regionCode": code,
                    "firstShown": date_field(r, "firstShown"),
                    "lastShown": date_field(r, "lastShown"),
                    "impressions": impressions(r.get("impressions")),
                    "surfaceServingStats": surfaces,
                })
            })
            .collect();

        let variations: Vec<Value> = array_items(creative.get("variations"))
            .filter(|v| v.is_object())
            .map(|v| {
                json!({
                    "clickUrl": v.get("clickUrl"),
                    "cta": v.get("cta"),
                    "description": v.get("description"),
                    "imageUrl": v.get("imageUrl"),
                })
            })
            .collect();

        let targeting = creative
            .get("targeting")
            .filter(|t| !t.is_null())
            .cloned()
            .unwrap_or_else(|| json!({}));

        Some(json!({
            "adLibraryUrl": ad_library_url(&self.advertiser_id, &creative_id),
            "advertiserId": self.advertiser_id,
            "advertiserName": creative.get("advertiserName"),
            "creativeId": creative_id,
            "firstShown": date_field(creative, "firstShown"),
            "lastShown": date_field(creative, "lastShown"),
            "format": creative.get("format"),
            "previewUrl": creative.get("previewUrl"),
            "regionStats": region_stats,
            "targeting": targeting,
            "variations": variations,
            "startUrl": self.start_url,
        }))
    }
}

impl Parser for ApiPayloadParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawAd>> {
        let payload: Value = serde_json::from_slice(bytes)?;
        Ok(self.parse_value(&payload))
    }
}

fn name_or_code(name: Option<&Value>, code: &str) -> String {
    match name {
        None | Some(Value::Null) => code.to_string(),
        some => to_string_or_empty(some),
    }
}

// Bounds are read as text, so only plain or comma-grouped integers count.
fn impressions(raw: Option<&Value>) -> ImpressionRange {
    let bound = |key: &str| to_opt_string(raw.and_then(|r| r.get(key)));
    ImpressionRange::from_strs(bound("lowerBound").as_deref(), bound("upperBound").as_deref())
}

fn date_field(obj: &Value, key: &str) -> Option<String> {
    parse_date(obj.get(key).and_then(Value::as_str))
}
