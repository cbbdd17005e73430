//! Batch geocoding of a pasted address table with CSV export.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use geoxval::aggregate::batch::{parse_pasted_table, BatchTable, DEFAULT_BATCH_PROVIDERS};
use geoxval::aggregate::read_input;
use geoxval::config::Config;
use geoxval::providers::ProviderRegistry;
use geoxval::render::write_batch_csv;
use geoxval::ProviderId;

#[derive(Parser, Debug)]
#[command(name = "batch")]
#[command(about = "Geocode a pasted address table with several providers")]
struct Args {
    /// Pasted table (first column "Address"); default: stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, default_value = "geocoded_results.csv")]
    output: PathBuf,

    /// Providers to query, one lat/lon column pair each
    #[arg(short, long, value_enum, value_delimiter = ',')]
    providers: Vec<ProviderId>,

    /// TOML configuration file
    #[arg(short, long, env = "GEOXVAL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    let text = read_input(args.input.as_deref())?;

    let addresses = parse_pasted_table(&text)?;
    if addresses.is_empty() {
        anyhow::bail!("No addresses found in input");
    }

    let providers: &[ProviderId] = if args.providers.is_empty() {
        DEFAULT_BATCH_PROVIDERS
    } else {
        &args.providers
    };

    let registry = ProviderRegistry::from_config(&config)?;
    let mut table = BatchTable::new(providers);

    info!(
        "Processing {} addresses, this may take a few minutes...",
        addresses.len()
    );

    let pb = ProgressBar::new(addresses.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    for address in &addresses {
        table.geocode_row(address, &registry).await;
        pb.inc(1);
    }
    pb.finish_and_clear();

    for warning in &table.warnings {
        eprintln!("warning: {}", warning);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_batch_csv(&table, file)?;

    let matched = table
        .rows
        .iter()
        .filter(|r| r.points.iter().any(Option::is_some))
        .count();
    info!(
        "Wrote {} rows ({} with at least one match) to {}",
        table.rows.len(),
        matched,
        args.output.display()
    );

    Ok(())
}
