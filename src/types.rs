use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Raw balance-change data as returned from external APIs/scrapers
pub type RawBalanceData = serde_json::Value;

/// Flow classification of a balance-change event, derived from the sign of
/// its normalized amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Inflow,
    Outflow,
    Neutral,
}

impl Direction {
    /// Positive amounts are inflows, negative amounts are outflows, and
    /// zero (including unparseable values normalized to zero) is neutral.
    pub fn from_amount(amount: f64) -> Self {
        if amount > 0.0 {
            Direction::Inflow
        } else if amount < 0.0 {
            Direction::Outflow
        } else {
            Direction::Neutral
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Direction::Inflow => "Inflow",
            Direction::Outflow => "Outflow",
            Direction::Neutral => "Neutral",
        };
        write!(f, "{label}")
    }
}

/// Canonical balance-change row produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceChangeRecord {
    /// Block containing the event, as given by the source
    pub block: Option<String>,
    /// Hash of the triggering transaction; absent for non-transaction changes
    pub transaction_id: Option<String>,
    /// Human-viewable transaction page, when the source supplied a link
    pub transaction_ref: Option<String>,
    /// Formatted absolute date/time, or a fallback label
    pub timestamp: String,
    pub direction: Direction,
    /// Signed balance delta in display units
    pub amount: f64,
    /// Total balance immediately after this event, in display units
    pub running_balance: f64,
}

/// Core trait that all balance-history sources must implement
#[async_trait::async_trait]
pub trait BalanceSource: Send + Sync {
    /// Unique identifier for this source adapter
    fn source_name(&self) -> &'static str;

    /// Fetch all raw balance-change records for one address
    async fn fetch_history(&self, address: &str) -> Result<Vec<RawBalanceData>>;
}
