use std::io::Write;
use std::path::Path;

use tabled::builder::Builder as TableBuilder;
use tabled::settings::Style;

use crate::error::Result;
use crate::types::{BalanceChangeRecord, Direction};

/// Aggregates the presentation layer reports over one normalized sequence
#[derive(Debug, PartialEq)]
pub struct FlowSummary {
    pub total: usize,
    pub inflows: usize,
    pub outflows: usize,
    /// Net balance change across the fetched window, in display units
    pub net: f64,
}

impl FlowSummary {
    pub fn from_records(records: &[BalanceChangeRecord]) -> Self {
        let inflows = records
            .iter()
            .filter(|r| r.direction == Direction::Inflow)
            .count();
        let outflows = records
            .iter()
            .filter(|r| r.direction == Direction::Outflow)
            .count();
        let net = records.iter().map(|r| r.amount).sum();
        Self {
            total: records.len(),
            inflows,
            outflows,
            net,
        }
    }
}

/// Render the records as a rounded-style table, amounts to 8 decimal places.
pub fn render_table(records: &[BalanceChangeRecord]) -> String {
    let mut builder = TableBuilder::default();
    builder.push_record([
        "Block",
        "Txn Hash",
        "Timestamp",
        "Direction",
        "Amount",
        "Running Balance",
    ]);

    for record in records {
        builder.push_record([
            record.block.as_deref().unwrap_or(""),
            record.transaction_id.as_deref().unwrap_or(""),
            &record.timestamp,
            &record.direction.to_string(),
            &format!("{:.8}", record.amount),
            &format!("{:.8}", record.running_balance),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Write the records as CSV: header row, one record per line, columns exactly
/// the `BalanceChangeRecord` fields, standard quoting.
pub fn write_csv<W: Write>(records: &[BalanceChangeRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv(records: &[BalanceChangeRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(records, file)
}

/// Default export filename, keyed by the address prefix
pub fn default_csv_name(address: &str) -> String {
    let prefix: String = address.chars().take(6).collect();
    format!("mantra_txns_{prefix}.csv")
}
