use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use ads_scraper::config::Settings;
use ads_scraper::constants::ENV_LOG_DIR;
use ads_scraper::export::{export_records, ExportFormat};
use ads_scraper::infra::http_client::ReqwestHttp;
use ads_scraper::input::load_advertisers;
use ads_scraper::logging;
use ads_scraper::pipeline::run_batch;

#[derive(Parser)]
#[command(name = "ads_scraper")]
#[command(about = "Ad transparency gallery scraper")]
#[command(version)]
struct Cli {
    /// Path to a JSON file describing the advertisers to scrape
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; the format follows the extension unless --format is given.
    /// Defaults to <output_dir>/<output_filename> from the settings
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional settings file (JSON or TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Limit on the number of ads extracted per advertiser
    #[arg(long)]
    max_ads_per_advertiser: Option<usize>,

    /// Export format: json, csv, xml or html
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Directory for daily-rolling JSON log files (falls back to ADS_SCRAPER_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    let log_dir = cli.log_dir.clone().or_else(|| {
        std::env::var(ENV_LOG_DIR)
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
    });
    let _log_guard = logging::init_logging(log_dir.as_deref());

    let settings = Settings::load(cli.settings.as_deref());
    let output_path = settings.resolve_output_path(cli.output.as_deref());
    let format = cli
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&output_path));
    info!("Using output path: {} ({})", output_path.display(), format);

    if !cli.input.exists() {
        bail!("Input file {} does not exist.", cli.input.display());
    }
    info!("Loading input from {}", cli.input.display());
    let advertisers = load_advertisers(&cli.input)
        .with_context(|| format!("Failed to load advertisers from {}", cli.input.display()))?;
    info!("Loaded {} advertiser descriptor(s).", advertisers.len());

    let http = ReqwestHttp::new(&settings.http).context("Failed to build HTTP client")?;
    let max_ads = cli.max_ads_per_advertiser.or(settings.max_ads_per_advertiser);
    let result = run_batch(&advertisers, max_ads, &http).await;

    if !result.errors.is_empty() {
        warn!("{} advertiser(s) failed during the run", result.errors.len());
    }
    if result.skipped_ads > 0 {
        warn!("{} ad(s) could not be normalized and were skipped", result.skipped_ads);
    }

    if result.records.is_empty() {
        warn!("No ad records were extracted; nothing to export.");
    } else {
        export_records(&result.records, &output_path, format)
            .with_context(|| format!("Failed to export to {}", output_path.display()))?;
    }

    info!("Done. Extracted {} ad record(s).", result.records.len());
    Ok(())
}
