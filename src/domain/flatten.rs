use serde::Serialize;

use crate::domain::ad::{AdRecord, AdVariation};
use crate::domain::region::{RegionStat, SurfaceServingStat};

/// One denormalized export row: ad fields, one region, one surface of that
/// region, the ad's targeting summary and one variation.
///
/// Every row carries every column; absent values are `""` or `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRow {
    pub ad_library_url: String,
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub creative_id: String,
    pub format: String,
    pub first_shown: String,
    pub last_shown: String,
    pub preview_url: String,
    pub start_url: String,
    pub region_code: String,
    pub region_name: String,
    pub region_first_shown: String,
    pub region_last_shown: String,
    pub region_impressions_lower: u64,
    pub region_impressions_upper: u64,
    pub surface_code: String,
    pub surface_name: String,
    pub surface_impressions_lower: u64,
    pub surface_impressions_upper: u64,
    pub targeting_demographics_true: String,
    pub targeting_geography_true: String,
    pub targeting_contextual_true: String,
    pub targeting_advertiser_list_true: String,
    pub variation_click_url: String,
    pub variation_cta: String,
    pub variation_description: String,
    pub variation_image_url: String,
}

impl FlatRow {
    /// Column names in output order, matching the serialized field names.
    pub const COLUMNS: [&'static str; 27] = [
        "adLibraryUrl",
        "advertiserId",
        "advertiserName",
        "creativeId",
        "format",
        "firstShown",
        "lastShown",
        "previewUrl",
        "startUrl",
        "regionCode",
        "regionName",
        "regionFirstShown",
        "regionLastShown",
        "regionImpressionsLower",
        "regionImpressionsUpper",
        "surfaceCode",
        "surfaceName",
        "surfaceImpressionsLower",
        "surfaceImpressionsUpper",
        "targetingDemographicsTrue",
        "targetingGeographyTrue",
        "targetingContextualTrue",
        "targetingAdvertiserListTrue",
        "variationClickUrl",
        "variationCta",
        "variationDescription",
        "variationImageUrl",
    ];

    /// Cell values as text, aligned with [`FlatRow::COLUMNS`].
    pub fn values(&self) -> [String; 27] {
        [
            self.ad_library_url.clone(),
            self.advertiser_id.clone(),
            self.advertiser_name.clone(),
            self.creative_id.clone(),
            self.format.clone(),
            self.first_shown.clone(),
            self.last_shown.clone(),
            self.preview_url.clone(),
            self.start_url.clone(),
            self.region_code.clone(),
            self.region_name.clone(),
            self.region_first_shown.clone(),
            self.region_last_shown.clone(),
            self.region_impressions_lower.to_string(),
            self.region_impressions_upper.to_string(),
            self.surface_code.clone(),
            self.surface_name.clone(),
            self.surface_impressions_lower.to_string(),
            self.surface_impressions_upper.to_string(),
            self.targeting_demographics_true.clone(),
            self.targeting_geography_true.clone(),
            self.targeting_contextual_true.clone(),
            self.targeting_advertiser_list_true.clone(),
            self.variation_click_url.clone(),
            self.variation_cta.clone(),
            self.variation_description.clone(),
            self.variation_image_url.clone(),
        ]
    }
}

/// Expands an ad into the cross product regions × surfaces × variations.
///
/// An empty region list, surface list or variation list is replaced by a single
/// blank entry, so every ad yields at least one row.
pub fn flatten_ad(ad: &AdRecord) -> Vec<FlatRow> {
    let blank_region = [RegionStat::default()];
    let blank_surface = [SurfaceServingStat::default()];
    let blank_variation = [AdVariation::default()];

    let regions = non_empty_or(&ad.region_stats, &blank_region);
    let variations = non_empty_or(&ad.variations, &blank_variation);
    let [demographics, geography, contextual, advertiser_list] = ad
        .targeting
        .as_ref()
        .map(|t| t.active_codes())
        .unwrap_or_default();

    let base = FlatRow {
        ad_library_url: ad.ad_library_url.clone(),
        advertiser_id: ad.advertiser_id.clone(),
        advertiser_name: ad.advertiser_name.clone(),
        creative_id: ad.creative_id.clone(),
        format: ad.format.clone(),
        first_shown: ad.first_shown.clone(),
        last_shown: ad.last_shown.clone(),
        preview_url: ad.preview_url.clone().unwrap_or_default(),
        start_url: ad.start_url.clone().unwrap_or_default(),
        targeting_demographics_true: demographics,
        targeting_geography_true: geography,
        targeting_contextual_true: contextual,
        targeting_advertiser_list_true: advertiser_list,
        ..FlatRow::default()
    };

    let mut rows = Vec::new();
    for region in regions {
        for surface in non_empty_or(&region.surfaces, &blank_surface) {
            for variation in variations {
                rows.push(FlatRow {
                    region_code: region.region_code.clone(),
                    region_name: region.region_name.clone(),
                    region_first_shown: region.first_shown.clone(),
                    region_last_shown: region.last_shown.clone(),
                    region_impressions_lower: region.impressions.lower_bound,
                    region_impressions_upper: region.impressions.upper_bound,
                    surface_code: surface.surface_code.clone(),
                    surface_name: surface.surface_name.clone(),
                    surface_impressions_lower: surface.impressions.lower_bound,
                    surface_impressions_upper: surface.impressions.upper_bound,
                    variation_click_url: variation.click_url.clone().unwrap_or_default(),
                    variation_cta: variation.cta.clone().unwrap_or_default(),
                    variation_description: variation.description.clone().unwrap_or_default(),
                    variation_image_url: variation.image_url.clone().unwrap_or_default(),
                    ..base.clone()
                });
            }
        }
    }
    rows
}

/// Flattens a batch of ads, preserving ad order.
pub fn flatten_ads(ads: &[AdRecord]) -> Vec<FlatRow> {
    ads.iter().flat_map(flatten_ad).collect()
}

fn non_empty_or<'a, T>(items: &'a [T], fallback: &'a [T]) -> &'a [T] {
    if items.is_empty() {
        fallback
    } else {
        items
    }
}
