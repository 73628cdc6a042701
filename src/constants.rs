/// Source adapter name constants to ensure consistency across the codebase
/// These names appear in the CLI and in the source registry

pub const BLOCKSCOUT_API_SOURCE: &str = "blockscout_api";
pub const HTML_TABLE_SOURCE: &str = "html_table";

/// Default explorer instance queried when no base URL is given
pub const DEFAULT_BASE_URL: &str = "https://blockscout.mantrascan.io";

/// Display denomination of the chain's native coin
pub const DENOMINATION: &str = "OM";

/// Smallest-unit ticks per display unit (the chain uses 18 decimals)
pub const SMALLEST_UNIT_SCALE: f64 = 1e18;

/// Display pattern for absolute timestamps: MM/DD/YYYY HH:MM:SS
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Upstream request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Get all supported source adapter names
pub fn supported_sources() -> Vec<&'static str> {
    vec![BLOCKSCOUT_API_SOURCE, HTML_TABLE_SOURCE]
}
