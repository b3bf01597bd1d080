use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_FILENAME, DEFAULT_RETRIES,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ENV_OUTPUT_DIR,
};
use crate::error::{Result, ScraperError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub output_filename: String,
    pub max_ads_per_advertiser: Option<usize>,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub retries: u32,
    pub backoff_factor: f64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            max_ads_per_advertiser: None,
            http: HttpSettings::default(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults on any problem.
    ///
    /// A broken settings file is never fatal: it is logged and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let mut settings = match path {
            None => {
                info!("No settings file provided; using defaults.");
                Settings::default()
            }
            Some(path) if !path.exists() => {
                warn!("Settings file {} not found; using defaults.", path.display());
                Settings::default()
            }
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                error!("Failed to read settings file {}: {}", path.display(), e);
                Settings::default()
            }),
        };
        settings.apply_env_overrides();
        settings
    }

    /// Parses a settings file; `.toml` files use TOML, everything else JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            return Ok(toml::from_str(&content)?);
        }

        let value: serde_json::Value = serde_json::from_str(&content)?;
        if !value.is_object() {
            return Err(ScraperError::Config(format!(
                "settings file {} did not contain a JSON object",
                path.display()
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
    }

    /// Resolves the export path: an explicit CLI path wins over the settings.
    pub fn resolve_output_path(&self, cli_output: Option<&Path>) -> PathBuf {
        match cli_output {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(&self.output_filename),
        }
    }
}
