//! Normalized ad data model: impression ranges, targeting flags, aggregated
//! region statistics, ad records and their flat export rows.

pub mod ad;
pub mod flatten;
pub mod impressions;
pub mod region;
pub mod targeting;

pub use ad::{parse_ads, AdRecord, AdVariation};
pub use flatten::{flatten_ad, flatten_ads, FlatRow};
pub use impressions::ImpressionRange;
pub use region::{aggregate_regions, parse_region_stats, RegionStat, SurfaceServingStat};
pub use targeting::{CategoryFlags, TargetingInfo};
