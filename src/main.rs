use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use om_explorer::constants;
use om_explorer::logging;
use om_explorer::pipeline::Pipeline;
use om_explorer::report::{self, FlowSummary};
use om_explorer::sources;

#[derive(Parser)]
#[command(name = "om-explorer")]
#[command(about = "Mantra OM coin balance history explorer")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and display the balance history for a wallet address
    Fetch {
        /// Wallet address to look up
        #[arg(long)]
        address: String,

        /// Source adapter to use. Available: blockscout_api, html_table
        #[arg(long, default_value = constants::BLOCKSCOUT_API_SOURCE)]
        source: String,

        /// Explorer base URL
        #[arg(long, default_value = constants::DEFAULT_BASE_URL)]
        base_url: String,

        /// Export the history to CSV after displaying it
        #[arg(long)]
        export: bool,

        /// CSV output path (implies --export)
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    /// List the available source adapters
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            address,
            source,
            base_url,
            export,
            csv,
        } => {
            let Some(adapter) = sources::create_source(&source, &base_url) else {
                error!("Unknown source specified");
                println!(
                    "⚠️  Unknown source: {} (available: {})",
                    source,
                    constants::supported_sources().join(", ")
                );
                std::process::exit(1);
            };

            println!("🔄 Fetching balance history for {address}...");
            match Pipeline::run_for_source(adapter, &address).await {
                Ok(outcome) if outcome.records.is_empty() => {
                    info!("No records returned for {}", address);
                    println!("ℹ️  No balance history found for this address.");
                }
                Ok(outcome) => {
                    let summary = FlowSummary::from_records(&outcome.records);

                    println!("\n📊 Balance history via {}:", outcome.source_name);
                    println!("   Total events: {}", summary.total);
                    println!("   Inflows: {}", summary.inflows);
                    println!("   Outflows: {}", summary.outflows);
                    println!(
                        "   Net balance: {:.4} {}",
                        summary.net,
                        constants::DENOMINATION
                    );
                    if outcome.skipped > 0 {
                        println!("   Skipped records: {}", outcome.skipped);
                    }

                    println!("\n{}", report::render_table(&outcome.records));

                    if export || csv.is_some() {
                        let path = csv.unwrap_or_else(|| {
                            PathBuf::from(report::default_csv_name(&address))
                        });
                        report::export_csv(&outcome.records, &path)?;
                        info!("Exported {} records to {}", summary.total, path.display());
                        println!("💾 Saved CSV to {}", path.display());
                    }
                }
                Err(e) => {
                    error!("Fetch failed: {}", e);
                    println!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Sources => {
            println!("Available sources:");
            for name in constants::supported_sources() {
                println!("   - {name}");
            }
        }
    }

    Ok(())
}
