use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::{SMALLEST_UNIT_SCALE, TIMESTAMP_DISPLAY_FORMAT};
use crate::types::{BalanceChangeRecord, Direction, RawBalanceData};

/// Field aliases resolved in fixed declared order; the upstream schema has
/// shifted between these names over time.
pub const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "block_timestamp", "time"];
pub const BLOCK_ALIASES: &[&str] = &["block_number", "block"];
pub const LINK_ALIASES: &[&str] = &["transaction_link", "tx_link"];

/// Path marker whose following segment is the transaction hash
const TX_PATH_MARKER: &str = "/tx/";

/// Everything that is not a digit, decimal point, or minus sign in
/// pre-rendered amount text (thousands separators, denomination suffixes)
static DISPLAY_TEXT_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]").unwrap());

/// Convert one raw balance-change record into a canonical row.
///
/// Never fails: malformed or missing fields degrade to documented defaults
/// (zero amount, raw-string timestamp, `Neutral` direction) so one bad record
/// cannot abort the batch.
pub fn normalize(raw: &RawBalanceData) -> BalanceChangeRecord {
    let block = first_alias(raw, BLOCK_ALIASES).and_then(field_text);

    let transaction_ref = first_alias(raw, LINK_ALIASES)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    // The id embedded in the link is authoritative over the hash field.
    let transaction_id = transaction_ref
        .as_deref()
        .and_then(extract_transaction_id)
        .or_else(|| {
            raw.get("transaction_hash")
                .and_then(Value::as_str)
                .map(String::from)
        });

    let amount = quantity(raw, "delta");
    let running_balance = quantity(raw, "value");
    let timestamp = display_timestamp(raw, block.as_deref());

    BalanceChangeRecord {
        block,
        transaction_id,
        transaction_ref,
        timestamp,
        direction: Direction::from_amount(amount),
        amount,
        running_balance,
    }
}

/// A record must carry a block identifier and at least one quantity field to
/// be worth emitting; anything thinner is skipped by the caller.
pub fn is_extractable(raw: &RawBalanceData) -> bool {
    let Some(map) = raw.as_object() else {
        return false;
    };
    BLOCK_ALIASES.iter().any(|key| map.contains_key(*key))
        && (map.contains_key("delta") || map.contains_key("value"))
}

fn first_alias<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

/// Textual form of a scalar field; numbers render as-is, strings are trimmed
/// and empty strings count as absent.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_timestamp(raw: &RawBalanceData, block: Option<&str>) -> String {
    match first_alias(raw, TIMESTAMP_ALIASES).and_then(field_text) {
        Some(raw_time) => format_instant(&raw_time).unwrap_or(raw_time),
        None => format!("Block #{}", block.unwrap_or("?")),
    }
}

/// Parse an ISO-8601-like timestamp (with or without an offset) and reformat
/// it into the fixed display pattern. `None` means the caller should fall
/// back to the raw string.
fn format_instant(raw_time: &str) -> Option<String> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw_time)
        .map(|dt| dt.naive_utc())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw_time, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    Some(parsed.format(TIMESTAMP_DISPLAY_FORMAT).to_string())
}

/// Normalize one quantity field to display units. Sources deliver either an
/// integer count of smallest-unit ticks (numeric, or a bare integer string)
/// that needs scaling, or pre-rendered display text that needs stripping.
/// Unparseable values normalize to zero.
fn quantity(raw: &Value, field: &str) -> f64 {
    match raw.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|ticks| ticks / SMALLEST_UNIT_SCALE)
            .unwrap_or(0.0),
        Some(Value::String(s)) => quantity_from_text(s),
        _ => 0.0,
    }
}

fn quantity_from_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if is_raw_ticks(trimmed) {
        trimmed
            .parse::<f64>()
            .map(|ticks| ticks / SMALLEST_UNIT_SCALE)
            .unwrap_or(0.0)
    } else {
        let cleaned = DISPLAY_TEXT_NOISE.replace_all(trimmed, "");
        cleaned.parse::<f64>().unwrap_or(0.0)
    }
}

/// A bare integer (optionally negative) is a smallest-unit tick count;
/// anything with separators, a decimal point, or a suffix is display text.
fn is_raw_ticks(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Extract the path segment following `/tx/` from a transaction link.
fn extract_transaction_id(link: &str) -> Option<String> {
    let (_, rest) = link.split_once(TX_PATH_MARKER)?;
    let id = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .trim();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_follows_amount_sign() {
        let inflow = normalize(&json!({ "block_number": 1, "delta": "1000000000000000000" }));
        assert_eq!(inflow.direction, Direction::Inflow);

        let outflow = normalize(&json!({ "block_number": 1, "delta": "-500000000000000000" }));
        assert_eq!(outflow.direction, Direction::Outflow);

        let zero = normalize(&json!({ "block_number": 1, "delta": "0" }));
        assert_eq!(zero.direction, Direction::Neutral);

        let unparseable = normalize(&json!({ "block_number": 1, "delta": "not a number" }));
        assert_eq!(unparseable.direction, Direction::Neutral);
        assert_eq!(unparseable.amount, 0.0);
    }

    #[test]
    fn test_tick_scaling() {
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "1000000000000000000",
            "value": "3000000000000000000"
        }));
        assert_eq!(record.amount, 1.0);
        assert_eq!(record.running_balance, 3.0);
    }

    #[test]
    fn test_display_text_amounts_are_stripped_not_scaled() {
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "-1,234.5678 OM",
            "value": "9,876.5 OM"
        }));
        assert_eq!(record.amount, -1234.5678);
        assert_eq!(record.running_balance, 9876.5);
        assert_eq!(record.direction, Direction::Outflow);
    }

    #[test]
    fn test_timestamp_formatting() {
        let record = normalize(&json!({
            "block_number": 12345,
            "delta": "0",
            "timestamp": "2026-01-08T13:38:00.000000Z"
        }));
        assert_eq!(record.timestamp, "01/08/2026 13:38:00");
    }

    #[test]
    fn test_timestamp_without_offset() {
        let record = normalize(&json!({
            "block_number": 12345,
            "delta": "0",
            "timestamp": "2026-01-08T13:38:00"
        }));
        assert_eq!(record.timestamp, "01/08/2026 13:38:00");
    }

    #[test]
    fn test_unparseable_timestamp_passes_through() {
        let record = normalize(&json!({
            "block_number": 12345,
            "delta": "0",
            "timestamp": "garbage"
        }));
        assert_eq!(record.timestamp, "garbage");
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_block_label() {
        let record = normalize(&json!({ "block_number": 12345, "delta": "0" }));
        assert_eq!(record.timestamp, "Block #12345");
    }

    #[test]
    fn test_timestamp_alias_order() {
        // "timestamp" wins over the later aliases when both are present
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "0",
            "timestamp": "2026-01-08T13:38:00Z",
            "block_timestamp": "2020-06-01T00:00:00Z"
        }));
        assert_eq!(record.timestamp, "01/08/2026 13:38:00");

        let fallback = normalize(&json!({
            "block_number": 1,
            "delta": "0",
            "block_timestamp": "2020-06-01T00:00:00Z"
        }));
        assert_eq!(fallback.timestamp, "06/01/2020 00:00:00");
    }

    #[test]
    fn test_transaction_id_from_link() {
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "0",
            "transaction_link": "https://blockscout.mantrascan.io/tx/0xABCDEF"
        }));
        assert_eq!(record.transaction_id.as_deref(), Some("0xABCDEF"));
        assert_eq!(
            record.transaction_ref.as_deref(),
            Some("https://blockscout.mantrascan.io/tx/0xABCDEF")
        );
    }

    #[test]
    fn test_link_id_wins_over_hash_field() {
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "0",
            "transaction_hash": "0x111111",
            "transaction_link": "https://blockscout.mantrascan.io/tx/0x222222?tab=logs"
        }));
        assert_eq!(record.transaction_id.as_deref(), Some("0x222222"));
    }

    #[test]
    fn test_hash_field_used_when_no_link() {
        let record = normalize(&json!({
            "block_number": 1,
            "delta": "0",
            "transaction_hash": "0x111111"
        }));
        assert_eq!(record.transaction_id.as_deref(), Some("0x111111"));
        assert_eq!(record.transaction_ref, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "block_number": 777,
            "delta": "-42000000000000000000",
            "value": "1000000000000000000",
            "timestamp": "2026-01-08T13:38:00.000000Z",
            "transaction_hash": "0xfeed"
        });
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn test_numeric_block_and_numeric_amounts() {
        let record = normalize(&json!({
            "block_number": 98765,
            "delta": 2000000000000000000_i64,
            "value": 2000000000000000000_i64
        }));
        assert_eq!(record.block.as_deref(), Some("98765"));
        assert_eq!(record.amount, 2.0);
        assert_eq!(record.direction, Direction::Inflow);
    }

    #[test]
    fn test_extractability() {
        assert!(is_extractable(&json!({ "block_number": 1, "delta": "0" })));
        assert!(is_extractable(&json!({ "block": "1", "value": "0" })));
        assert!(!is_extractable(&json!({ "delta": "0" })));
        assert!(!is_extractable(&json!({ "block_number": 1 })));
        assert!(!is_extractable(&json!("just a string")));
        assert!(!is_extractable(&json!(null)));
    }
}
