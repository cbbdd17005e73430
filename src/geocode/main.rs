//! One-shot cross-validation run.
//!
//! Reads addresses or "lat,lon" lines, geocodes them with the selected
//! providers, groups the results into markers and prints a results table
//! with congressional district lookups.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geoxval::aggregate::{aggregate, classify, input_lines, read_input, LineKind};
use geoxval::config::Config;
use geoxval::providers::ProviderRegistry;
use geoxval::render::{
    describe_click, format_table, legend_lines, markers_to_geojson, write_rows_csv, Report,
};
use geoxval::spatial::DistrictLayer;
use geoxval::ProviderId;

#[derive(Parser, Debug)]
#[command(name = "geocode")]
#[command(about = "Cross-validate addresses against several geocoding providers")]
struct Args {
    /// File with one address or "lat,lon" pair per line (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Providers to query (default: from config, else all)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    providers: Vec<ProviderId>,

    /// TOML configuration file
    #[arg(short, long, env = "GEOXVAL_CONFIG")]
    config: Option<PathBuf>,

    /// District GeoJSON (overrides config)
    #[arg(long)]
    districts: Option<PathBuf>,

    /// Property holding the district identifier (overrides config)
    #[arg(long)]
    district_field: Option<String>,

    /// Decimal places used to merge near-identical results
    #[arg(long)]
    precision: Option<u32>,

    /// Resolve an extra "lat,lon" point, as if clicked on the map
    #[arg(long)]
    click: Option<String>,

    /// Write markers as GeoJSON to this path
    #[arg(long)]
    markers_out: Option<PathBuf>,

    /// Write the results table as CSV to this path
    #[arg(long)]
    table_out: Option<PathBuf>,

    /// Print the color legend
    #[arg(long)]
    legend: bool,
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

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(path) = &args.districts {
        config.districts.path = Some(path.clone());
    }
    if let Some(field) = &args.district_field {
        config.districts.id_field = field.clone();
    }
    let precision = args.precision.unwrap_or(config.geocoding.precision);

    let enabled: BTreeSet<ProviderId> = if args.providers.is_empty() {
        config.geocoding.default_providers.iter().copied().collect()
    } else {
        args.providers.iter().copied().collect()
    };
    info!(
        "Providers: {}",
        enabled
            .iter()
            .map(ProviderId::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let registry = ProviderRegistry::from_config(&config)?;
    let layer = DistrictLayer::from_config(&config.districts);

    let text = read_input(args.input.as_deref())?;
    let lines = input_lines(&text);
    info!("Processing {} input lines", lines.len());

    let aggregation = aggregate(lines.iter().copied(), &enabled, &registry).await;
    let report = Report::build(&aggregation, &layer, precision);

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    if report.rows.is_empty() {
        println!("No results.");
    } else {
        println!("{}", format_table(&report.rows));
        println!();
        println!(
            "{} results in {} markers",
            report.rows.len(),
            report.markers.len()
        );
    }

    if let Some(raw) = &args.click {
        match classify(raw.trim()) {
            LineKind::Coordinate(point) => println!("{}", describe_click(&point, &layer)),
            _ => warn!("Ignoring --click {:?}: expected \"lat,lon\"", raw),
        }
    }

    if let Some(path) = &args.markers_out {
        let doc = markers_to_geojson(&report.markers, &config.map);
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &doc)?;
        info!("Wrote {} markers to {}", report.markers.len(), path.display());
    }

    if let Some(path) = &args.table_out {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_rows_csv(&report.rows, file)?;
        info!("Wrote {} rows to {}", report.rows.len(), path.display());
    }

    if args.legend {
        println!();
        println!("Color Legend");
        for line in legend_lines() {
            println!("- {}", line);
        }
    }

    Ok(())
}
