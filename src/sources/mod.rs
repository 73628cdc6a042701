pub mod blockscout_api;
pub mod html_table;

use crate::constants;
use crate::types::BalanceSource;

use blockscout_api::BlockscoutApiSource;
use html_table::HtmlTableSource;

/// Look up a source adapter by its CLI name.
pub fn create_source(source_name: &str, base_url: &str) -> Option<Box<dyn BalanceSource>> {
    match source_name {
        constants::BLOCKSCOUT_API_SOURCE => Some(Box::new(BlockscoutApiSource::new(base_url))),
        constants::HTML_TABLE_SOURCE => Some(Box::new(HtmlTableSource::new(base_url))),
        _ => None,
    }
}
