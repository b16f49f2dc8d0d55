use analytics::AnalyticsEngine;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use configuration::ReportSettings;
use ledger::Ledger;
use std::path::{Path, PathBuf};

mod output;

/// The main entry point for the TradeMaster journal tools.
fn main() -> Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, settings.report),
        Commands::Validate(args) => handle_validate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance and risk analytics for a personal trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./journal.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a performance report over a ledger snapshot.
    Report(ReportArgs),
    /// Check every trade in a ledger snapshot against its invariants.
    Validate(ValidateArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Ledger snapshot: a JSON array of trade records.
    #[arg(long)]
    ledger: PathBuf,

    /// Print the full report as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Overrides for the report defaults in the configuration file.
    #[command(flatten)]
    filter: ReportSettings,
}

#[derive(Parser)]
struct ValidateArgs {
    /// Ledger snapshot: a JSON array of trade records.
    #[arg(long)]
    ledger: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Reads and parses a ledger snapshot, enforcing unique trade ids.
fn load_ledger(path: &Path) -> Result<Ledger> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file {}", path.display()))?;
    let ledger: Ledger = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse ledger file {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        trades = ledger.len(),
        "Ledger loaded."
    );
    Ok(ledger)
}

fn handle_report(args: ReportArgs, defaults: ReportSettings) -> Result<()> {
    let ledger = load_ledger(&args.ledger)?;
    let report_settings = defaults.overridden_by(args.filter);
    let filter = report_settings.to_filter()?;

    let report = AnalyticsEngine::new()
        .compute_ledger_report(&ledger, &filter)
        .context("Failed to compute report")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::describe_filter(&report_settings));
        println!("{}", output::summary_table(&report));
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let ledger = load_ledger(&args.ledger)?;

    let mut invalid = 0;
    for trade in ledger.all_trades() {
        if let Err(e) = trade.validate() {
            tracing::error!(trade_id = %trade.id, error = %e, "Invalid trade.");
            invalid += 1;
        }
    }

    println!(
        "{} trades ({} open, {} closed) across {} symbols",
        ledger.len(),
        ledger.open_trades().count(),
        ledger.closed_trades().count(),
        ledger.symbols().len()
    );

    if invalid > 0 {
        bail!("{invalid} invalid trade(s) in {}", args.ledger.display());
    }
    println!("All trades are valid.");
    Ok(())
}
