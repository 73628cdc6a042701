use std::time::Duration;

use scraper::{Html, Selector};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::constants::{HTML_TABLE_SOURCE, REQUEST_TIMEOUT_SECS};
use crate::error::{ExplorerError, Result};
use crate::types::{BalanceSource, RawBalanceData};

/// Fixed column order of the rendered history table:
/// block / transaction-link / timestamp / running-balance / signed-amount
const EXPECTED_COLUMNS: usize = 5;

/// Fallback source: parse the rendered balance-history page directly when
/// the JSON endpoint is unavailable. Cell text maps onto the same field
/// names the API uses so the normalizer serves both sources.
pub struct HtmlTableSource {
    client: reqwest::Client,
    base_url: String,
}

impl HtmlTableSource {
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

    fn page_url(&self, address: &str) -> String {
        format!(
            "{}/address/{}?tab=coin_balance_history",
            self.base_url, address
        )
    }
}

/// Extract raw records from the page's table body. Rows with fewer cells
/// than the expected column count are skipped, not emitted with nulls.
/// Relative-age timestamp text is carried as-is; the normalizer passes it
/// through unchanged when it does not parse as an absolute instant.
pub fn parse_rows(html: &str) -> Vec<RawBalanceData> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table tbody tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let mut rows = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < EXPECTED_COLUMNS {
            warn!("Skipping table row with {} cells", cells.len());
            continue;
        }

        let cell_text =
            |index: usize| cells[index].text().collect::<String>().trim().to_string();
        let link = cells[1]
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        rows.push(json!({
            "block_number": cell_text(0),
            "transaction_link": link,
            "timestamp": cell_text(2),
            "value": cell_text(3),
            "delta": cell_text(4),
        }));
    }
    rows
}

#[async_trait::async_trait]
impl BalanceSource for HtmlTableSource {
    fn source_name(&self) -> &'static str {
        HTML_TABLE_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, address: &str) -> Result<Vec<RawBalanceData>> {
        let url = self.page_url(address);
        info!("Fetching balance history page {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ExplorerError::SourceUnavailable {
                message: format!("page returned status code {}", response.status()),
            });
        }

        let body = response.text().await?;
        let rows = parse_rows(&body);
        info!("Extracted {} rows from history table", rows.len());
        Ok(rows)
    }
}
