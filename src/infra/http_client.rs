use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::config::HttpSettings;
use crate::error::{Result, ScraperError};

/// reqwest-backed GET with exponential backoff between attempts.
pub struct ReqwestHttp {
    client: reqwest::Client,
    user_agent: String,
    retries: u32,
    backoff_factor: f64,
}

impl ReqwestHttp {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
            retries: settings.retries.max(1),
            backoff_factor: settings.backoff_factor.max(0.0),
        })
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor * 2f64.powi(attempt.saturating_sub(1) as i32);
        Duration::try_from_secs_f64(factor).unwrap_or(Duration::MAX)
    }

    async fn try_get(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    #[instrument(skip(self))]
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!("GET {} (attempt {}/{})", url, attempt, self.retries);
            match self.try_get(url).await {
                Ok(body) => {
                    debug!("GET {} returned {} bytes", url, body.len());
                    return Ok(body);
                }
                Err(e) if attempt < self.retries => {
                    warn!("GET {} failed on attempt {}/{}: {}", url, attempt, self.retries, e);
                    tokio::time::sleep(self.backoff_delay(attempt)).await;
                }
                Err(e) => {
                    error!("Failed to GET {} after {} attempts.", url, self.retries);
                    return Err(e);
                }
            }
        }
    }
}
