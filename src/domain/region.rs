use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::coerce::{array_items, to_string_or_empty};
use crate::domain::impressions::ImpressionRange;

/// Serving statistics for one placement surface inside a region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceServingStat {
    pub surface_code: String,
    pub surface_name: String,
    pub impressions: ImpressionRange,
}

/// Serving statistics for a creative in one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStat {
    pub region_code: String,
    pub region_name: String,
    pub first_shown: String,
    pub last_shown: String,
    pub impressions: ImpressionRange,
    #[serde(rename = "surfaceServingStats")]
    pub surfaces: Vec<SurfaceServingStat>,
}

impl SurfaceServingStat {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            surface_code: to_string_or_empty(raw.get("surfaceCode")),
            surface_name: to_string_or_empty(raw.get("surfaceName")),
            impressions: ImpressionRange::from_value(raw.get("impressions")),
        }
    }
}

impl RegionStat {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            region_code: to_string_or_empty(raw.get("regionCode")),
            region_name: to_string_or_empty(raw.get("regionName")),
            first_shown: to_string_or_empty(raw.get("firstShown")),
            last_shown: to_string_or_empty(raw.get("lastShown")),
            impressions: ImpressionRange::from_value(raw.get("impressions")),
            surfaces: array_items(raw.get("surfaceServingStats"))
                .filter(|s| s.is_object())
                .map(SurfaceServingStat::from_value)
                .collect(),
        }
    }

    fn key(&self) -> (String, String) {
        (self.region_code.clone(), self.region_name.clone())
    }

    /// Folds a later duplicate of this region into it: impressions add up,
    /// the shown-date range widens and surface lists are concatenated.
    fn absorb(&mut self, other: RegionStat) {
        self.impressions += other.impressions;
        if !other.first_shown.is_empty()
            && (self.first_shown.is_empty() || other.first_shown < self.first_shown)
        {
            self.first_shown = other.first_shown;
        }
        if !other.last_shown.is_empty()
            && (self.last_shown.is_empty() || other.last_shown > self.last_shown)
        {
            self.last_shown = other.last_shown;
        }
        self.surfaces.extend(other.surfaces);
    }
}

/// Parses a raw `regionStats` list and aggregates it. Non-list input and
/// non-object entries are ignored.
pub fn parse_region_stats(raw: Option<&Value>) -> Vec<RegionStat> {
    let regions: Vec<RegionStat> = array_items(raw)
        .filter(|r| {
            let keep = r.is_object();
            if !keep {
                debug!("Ignoring non-object region entry: {}", r);
            }
            keep
        })
        .map(RegionStat::from_value)
        .collect();
    aggregate_regions(regions)
}

/// Collapses duplicate regions into one entry per `(region_code, region_name)`.
///
/// The first occurrence of a key is the canonical entry and later ones are
/// absorbed into it. Inside each region, surfaces sharing a `surface_code` are
/// merged the same way (only impressions add up). The result is sorted by
/// `(region_code, region_name)` so row generation downstream is reproducible.
pub fn aggregate_regions(regions: Vec<RegionStat>) -> Vec<RegionStat> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut merged: Vec<RegionStat> = Vec::new();

    for region in regions {
        match index.get(&region.key()) {
            Some(&i) => merged[i].absorb(region),
            None => {
                index.insert(region.key(), merged.len());
                merged.push(region);
            }
        }
    }

    for region in &mut merged {
        region.surfaces = merge_surfaces(std::mem::take(&mut region.surfaces));
    }

    merged.sort_by(|a, b| {
        (&a.region_code, &a.region_name).cmp(&(&b.region_code, &b.region_name))
    });
    merged
}

fn merge_surfaces(surfaces: Vec<SurfaceServingStat>) -> Vec<SurfaceServingStat> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<SurfaceServingStat> = Vec::with_capacity(surfaces.len());

    for surface in surfaces {
        match index.get(&surface.surface_code) {
            Some(&i) => merged[i].impressions += surface.impressions,
            None => {
                index.insert(surface.surface_code.clone(), merged.len());
                merged.push(surface);
            }
        }
    }
    merged
}
