use std::time::Duration;

use serde_json::Value;
use tracing::{info, instrument};

use crate::constants::{BLOCKSCOUT_API_SOURCE, REQUEST_TIMEOUT_SECS};
use crate::error::{ExplorerError, Result};
use crate::types::{BalanceSource, RawBalanceData};

/// Structured source: the explorer's coin-balance-history JSON endpoint.
pub struct BlockscoutApiSource {
    client: reqwest::Client,
    base_url: String,
}

impl BlockscoutApiSource {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn history_url(&self, address: &str) -> String {
        format!(
            "{}/api/v2/addresses/{}/coin-balance-history",
            self.base_url, address
        )
    }
}

#[async_trait::async_trait]
impl BalanceSource for BlockscoutApiSource {
    fn source_name(&self) -> &'static str {
        BLOCKSCOUT_API_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, address: &str) -> Result<Vec<RawBalanceData>> {
        let url = self.history_url(address);
        info!("Requesting balance history from {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ExplorerError::SourceUnavailable {
                message: "wallet not found or no history available".to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ExplorerError::SourceUnavailable {
                message: format!("API returned status code {}", response.status()),
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;
        // A reachable address with no history returns an empty items array;
        // that is an informational outcome, not an error.
        let items = data
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        info!("Fetched {} balance-change items", items.len());
        Ok(items)
    }
}
