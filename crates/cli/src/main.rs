//! USDi simulator - Main entry point

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use usdi_cli::commands;

#[derive(Parser)]
#[command(name = "usdi-sim")]
#[command(about = "USDi - interest accrual and liability simulator", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data", global = true)]
    data: PathBuf,

    /// Protocol config (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file against a fresh deployment
    Run {
        /// Scenario file path
        scenario: PathBuf,
    },

    /// Evaluate the interest rate curve at a reserve ratio
    Curve {
        /// Reserve ratio between 0 and 1
        ratio: Decimal,
    },

    /// Show recent journal records
    Journal {
        /// Maximum number of records to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { scenario } => commands::run(&cli.data, &config, &scenario)?,
        Commands::Curve { ratio } => commands::curve(&config, ratio)?,
        Commands::Journal { limit } => commands::journal(&cli.data, limit)?,
    }

    Ok(())
}
