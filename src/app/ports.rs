use async_trait::async_trait;

use crate::error::Result;

/// Fetches gallery pages. Implementations own retry and timeout policy.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}
