use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{Parser, RawAd};
use crate::coerce::parse_date;
use crate::constants::ad_library_url;
use crate::domain::ImpressionRange;
use crate::error::Result;

static CREATIVE_SEL: Lazy<Selector> = Lazy::new(|| selector("[data-creative-id]"));
static REGION_SEL: Lazy<Selector> = Lazy::new(|| selector("[data-region-code]"));
static SURFACE_SEL: Lazy<Selector> = Lazy::new(|| selector("[data-surface-code]"));
static VARIATION_SEL: Lazy<Selector> = Lazy::new(|| selector("[data-variation]"));
static TARGETING_SCRIPT_SEL: Lazy<Selector> =
    Lazy::new(|| selector(r#"script[type="application/json"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Parses gallery markup where each creative is an element carrying
/// `data-creative-id`, with nested `data-region-code`, `data-surface-code` and
/// `data-variation` elements.
pub struct GalleryHtmlParser {
    pub advertiser_id: String,
    pub start_url: Option<String>,
}

impl GalleryHtmlParser {
    pub fn new(advertiser_id: String, start_url: Option<String>) -> Self {
        Self {
            advertiser_id,
            start_url,
        }
    }

    pub fn parse_html(&self, html: &str) -> Vec<RawAd> {
        let document = Html::parse_document(html);
        let blocks: Vec<ElementRef> = document.select(&CREATIVE_SEL).collect();
        info!("Found {} creative block(s) in HTML.", blocks.len());

        blocks
            .into_iter()
            .filter_map(|block| self.parse_block(block))
            .collect()
    }

    fn parse_block(&self, block: ElementRef) -> Option<RawAd> {
        let Some(creative_id) = attr(block, "data-creative-id") else {
            debug!("Skipping creative block without an id");
            return None;
        };

        let preview_url = attr(block, "data-preview-url").or_else(|| attr(block, "data-image-url"));
        let first_shown = parse_date(attr(block, "data-first-shown"));
        let last_shown = parse_date(attr(block, "data-last-shown"));

        let region_stats: Vec<Value> = block
            .select(&REGION_SEL)
            .map(|region| region_json(region, first_shown.as_deref(), last_shown.as_deref()))
            .collect();

        let variations: Vec<Value> = block
            .select(&VARIATION_SEL)
            .map(|var| {
                json!({
                    "clickUrl": attr(var, "data-click-url"),
                    "cta": attr(var, "data-cta"),
                    "description": attr(var, "data-description"),
                    "imageUrl": attr(var, "data-image-url").or(preview_url),
                })
            })
            .collect();

        Some(json!({
            "adLibraryUrl": ad_library_url(&self.advertiser_id, creative_id),
            "advertiserId": self.advertiser_id,
            "advertiserName": attr(block, "data-advertiser-name"),
            "creativeId": creative_id,
            "firstShown": first_shown,
            "lastShown": last_shown,
            "format": attr(block, "data-format").or_else(|| attr(block, "data-ad-format")),
            "previewUrl": preview_url,
            "regionStats": region_stats,
            "targeting": targeting_json(block),
            "variations": variations,
            "startUrl": self.start_url,
        }))
    }
}

impl Parser for GalleryHtmlParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawAd>> {
        debug!("GalleryHtmlParser: start bytes_len={}", bytes.len());
        Ok(self.parse_html(&String::from_utf8_lossy(bytes)))
    }
}

/// Non-empty attribute value.
fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|v| !v.is_empty())
}

fn impressions_json(el: ElementRef) -> Value {
    let range = ImpressionRange::from_strs(
        attr(el, "data-impressions-lower"),
        attr(el, "data-impressions-upper"),
    );
    json!(range)
}

// Region dates fall back to the creative's own dates.
fn region_json(region: ElementRef, first_shown: Option<&str>, last_shown: Option<&str>) -> Value {
    let code = attr(region, "data-region-code").unwrap_or_default();
    let surfaces: Vec<Value> = region
        .select(&SURFACE_SEL)
        .map(|surface| {
            let s_code = attr(surface, "data-surface-code").unwrap_or_default();
            json!({
                "surfaceCode": s_code,
                "surfaceName": attr(surface, "data-surface-name").unwrap_or(s_code),
                "impressions": impressions_json(surface),
            })
        })
        .collect();

    json!({
        "regionCode": code,
        "regionName": attr(region, "data-region-name").unwrap_or(code),
        "firstShown": parse_date(attr(region, "data-first-shown").or(first_shown)).unwrap_or_default(),
        "lastShown": parse_date(attr(region, "data-last-shown").or(last_shown)).unwrap_or_default(),
        "impressions": impressions_json(region),
        "surfaceServingStats": surfaces,
    })
}

/// Targeting JSON from a `data-targeting-json` attribute, else from an embedded
/// `application/json` script. Unparsable JSON yields `{}`.
fn targeting_json(block: ElementRef) -> Value {
    let text = match attr(block, "data-targeting-json") {
        Some(text) => text.to_string(),
        None => match block.select(&TARGETING_SCRIPT_SEL).next() {
            Some(script) => script.text().collect::<String>(),
            None => return json!({}),
        },
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        debug!("Ignoring unparsable targeting JSON: {}", e);
        json!({})
    })
}
