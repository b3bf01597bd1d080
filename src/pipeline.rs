use tracing::{error, info, info_span, Instrument};

use crate::app::ports::HttpClientPort;
use crate::app::scrape_use_case::scrape_advertiser;
use crate::domain::{parse_ads, AdRecord};
use crate::input::AdvertiserDescriptor;

/// Outcome of scraping and normalizing a batch of advertisers.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<AdRecord>,
    pub raw_ads: usize,
    pub skipped_ads: usize,
    pub errors: Vec<String>,
}

/// Scrapes each advertiser in turn and normalizes the ads it yields.
///
/// A failing advertiser is logged and recorded in `errors`; the batch always
/// runs to completion.
pub async fn run_batch(
    advertisers: &[AdvertiserDescriptor],
    max_ads: Option<usize>,
    http: &dyn HttpClientPort,
) -> BatchResult {
    let mut result = BatchResult::default();
    let total = advertisers.len();

    for (idx, advertiser) in advertisers.iter().enumerate() {
        let n = idx + 1;
        let outcome = async {
            info!("Scraping advertiser {}/{} ...", n, total);
            scrape_advertiser(advertiser, max_ads, http).await
        }
        .instrument(info_span!("advertiser", n, total))
        .await;

        match outcome {
            Ok(raw_ads) => {
                let records = parse_ads(&raw_ads);
                info!("Advertiser {} yielded {} ad record(s).", n, records.len());
                result.raw_ads += raw_ads.len();
                result.skipped_ads += raw_ads.len() - records.len();
                result.records.extend(records);
            }
            Err(e) => {
                error!("Error while scraping advertiser {}: {}", n, e);
                result.errors.push(format!("advertiser {n}: {e}"));
            }
        }
    }
    result
}
