use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::normalizer;
use crate::types::{BalanceChangeRecord, BalanceSource};

/// Result of one fetch-and-normalize run
#[derive(Debug)]
pub struct FetchOutcome {
    pub source_name: String,
    /// Raw records the source produced, before any skipping
    pub total_raw: usize,
    /// Raw records dropped for having too few extractable fields
    pub skipped: usize,
    pub records: Vec<BalanceChangeRecord>,
}

pub struct Pipeline;

impl Pipeline {
    /// One sequential batch: fetch raw records, skip the unextractable ones,
    /// normalize each survivor. No retry, no caching, no state across runs.
    #[instrument(skip(source), fields(source_name = %source.source_name()))]
    pub async fn run_for_source(
        source: Box<dyn BalanceSource>,
        address: &str,
    ) -> Result<FetchOutcome> {
        let source_name = source.source_name().to_string();
        info!("Fetching balance history for {}", address);

        let raw_records = source.fetch_history(address).await?;
        let total_raw = raw_records.len();

        let mut records = Vec::with_capacity(total_raw);
        let mut skipped = 0;
        for (index, raw) in raw_records.iter().enumerate() {
            if !normalizer::is_extractable(raw) {
                warn!("Skipping record {} with too few fields", index);
                skipped += 1;
                continue;
            }
            records.push(normalizer::normalize(raw));
        }

        debug!(
            "Normalized {} of {} raw records ({} skipped)",
            records.len(),
            total_raw,
            skipped
        );

        Ok(FetchOutcome {
            source_name,
            total_raw,
            skipped,
            records,
        })
    }
}
