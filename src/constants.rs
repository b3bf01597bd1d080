/// Host serving the ad transparency gallery.
pub const TRANSPARENCY_HOST: &str = "adstransparency.google.com";

// Output defaults (used when neither the CLI nor the settings file names a path)
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.json";

// Environment overrides applied on top of the settings file
pub const ENV_OUTPUT_DIR: &str = "ADS_SCRAPER_OUTPUT_DIR";
pub const ENV_LOG_DIR: &str = "ADS_SCRAPER_LOG_DIR";

// HTTP fetch defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Date layouts accepted from the gallery, tried in order and rewritten as ISO dates.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Gallery URL for an advertiser.
pub fn gallery_url(advertiser_id: &str) -> String {
    format!("https://{TRANSPARENCY_HOST}/advertiser/{advertiser_id}")
}

/// Public library URL for a single creative.
pub fn ad_library_url(advertiser_id: &str, creative_id: &str) -> String {
    format!("https://{TRANSPARENCY_HOST}/advertiser/{advertiser_id}/creative/{creative_id}")
}
