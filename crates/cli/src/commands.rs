//! CLI commands

use anyhow::Context;
use rust_decimal::Decimal;
use std::path::Path;
use usdi_core::Wad;
use usdi_curve::Curve;
use usdi_events::EventReader;
use usdi_vault::ProtocolConfig;

use crate::context::AppContext;
use crate::scenario::{self, human, Scenario};

/// Load a config file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ProtocolConfig> {
    match path {
        Some(path) => ProtocolConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ProtocolConfig::default()),
    }
}

/// Run a scenario file against a fresh deployment
pub fn run(data: &Path, config: &ProtocolConfig, scenario_path: &Path) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(scenario_path)?;

    let mut config = config.clone();
    if let Some(start) = scenario.start_time {
        config.start_time = start;
    }

    let mut ctx = AppContext::new(data, &config)?;
    let outcomes = scenario::run(&mut ctx, &scenario)?;

    for outcome in &outcomes {
        println!("[{:>3}] {}", outcome.index, outcome.summary);
    }

    let journaled: usize = outcomes.iter().map(|o| o.records).sum();
    println!();
    println!("Steps:         {}", outcomes.len());
    println!("Journaled:     {} records in {}", journaled, ctx.journal_path().display());
    println!("Factor:        {}", human(ctx.controller.interest_factor()));
    println!("USDi supply:   {}", human(ctx.controller.usdi_total_supply()));
    println!("Reserve ratio: {}", human(ctx.controller.reserve_ratio()?));
    println!(
        "Base liability: {}",
        human(ctx.controller.total_base_liability())
    );
    Ok(())
}

/// Print the annual rate the configured curve gives at `ratio`
pub fn curve(config: &ProtocolConfig, ratio: Decimal) -> anyhow::Result<()> {
    let curve = config.curve.build()?;
    let rate = curve.value_at(Wad::from_decimal(ratio)?)?;
    println!("Reserve ratio {} -> annual rate {}", ratio, human(rate));
    Ok(())
}

/// Show the most recent journal records
pub fn journal(data: &Path, limit: usize) -> anyhow::Result<()> {
    let reader = EventReader::from_directory(data.join("journal"))?;
    let records = reader.read_last(limit)?;

    if records.is_empty() {
        println!("Journal is empty");
        return Ok(());
    }

    println!(
        "{:<8} {:<20} {:<22} {:<8} {}",
        "SEQ", "TIME", "EVENT", "VAULT", "CORRELATION"
    );
    println!("{}", "-".repeat(96));
    for record in &records {
        let vault = record
            .event
            .vault_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<20} {:<22} {:<8} {}",
            record.sequence,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.event.kind(),
            vault,
            record.correlation_id
        );
    }
    println!("{}", "-".repeat(96));
    println!("Showing {} of {} records", records.len(), reader.count()?);
    Ok(())
}
