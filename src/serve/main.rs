//! HTTP API for map front ends.
//!
//! Exposes the interactive flow (geocode + markers + table), map-click
//! district lookups and the batch CSV export.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geoxval::aggregate::batch::{parse_pasted_table, BatchTable, DEFAULT_BATCH_PROVIDERS};
use geoxval::aggregate::{aggregate, input_lines};
use geoxval::config::Config;
use geoxval::providers::ProviderRegistry;
use geoxval::render::{batch_csv_string, legend, markers_to_geojson, LegendEntry, Report, ResultRow};
use geoxval::spatial::{DistrictLayer, DistrictLookup};
use geoxval::{GeoPoint, ProviderId, Warning};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Geocoding cross-validation API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML configuration file
    #[arg(short, long, env = "GEOXVAL_CONFIG")]
    config: Option<PathBuf>,

    /// District GeoJSON (overrides config)
    #[arg(long)]
    districts: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    config: Config,
    registry: ProviderRegistry,
    /// Loaded once, read-only afterwards
    layer: DistrictLayer,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("geoxval API server");

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(path) = &args.districts {
        config.districts.path = Some(path.clone());
    }

    let registry = ProviderRegistry::from_config(&config)?;
    let layer = DistrictLayer::from_config(&config.districts);
    info!(
        "District layer: {} polygons{}",
        layer.len(),
        if layer.is_available() { "" } else { " (unavailable)" }
    );

    let state = Arc::new(AppState {
        config,
        registry,
        layer,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/providers", get(providers_handler))
        .route("/v1/geocode", post(geocode_handler))
        .route("/v1/district", get(district_handler))
        .route("/v1/batch", post(batch_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.layer.is_available() { "ok" } else { "degraded" },
        providers: state.registry.len(),
        districts: state.layer.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    providers: usize,
    districts: usize,
}

#[derive(Serialize)]
struct ProviderInfo {
    id: ProviderId,
    name: &'static str,
    available: bool,
}

#[derive(Serialize)]
struct ProvidersResponse {
    providers: Vec<ProviderInfo>,
    defaults: Vec<ProviderId>,
    legend: Vec<LegendEntry>,
}

/// Provider list with availability and the color legend
async fn providers_handler(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    let providers = ProviderId::all()
        .iter()
        .map(|&id| ProviderInfo {
            id,
            name: id.display_name(),
            available: state.registry.contains(id),
        })
        .collect();

    Json(ProvidersResponse {
        providers,
        defaults: state.config.geocoding.default_providers.clone(),
        legend: legend(),
    })
}

#[derive(Deserialize)]
struct GeocodeRequest {
    /// One address or "lat,lon" per line
    text: String,
    /// Providers to query (defaults from config)
    providers: Option<Vec<ProviderId>>,
    /// Grouping precision override
    precision: Option<u32>,
}

#[derive(Serialize)]
struct GeocodeResponse {
    /// GeoJSON FeatureCollection of markers
    markers: Value,
    results: Vec<ResultRow>,
    warnings: Vec<Warning>,
}

/// Geocode a submission and return markers plus the results table
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GeocodeRequest>,
) -> Json<GeocodeResponse> {
    let enabled: BTreeSet<ProviderId> = request
        .providers
        .unwrap_or_else(|| state.config.geocoding.default_providers.clone())
        .into_iter()
        .collect();
    let precision = request
        .precision
        .unwrap_or(state.config.geocoding.precision);

    let lines = input_lines(&request.text);
    let aggregation = aggregate(lines.clone(), &enabled, &state.registry).await;
    let report = Report::build(&aggregation, &state.layer, precision);

    Json(GeocodeResponse {
        markers: markers_to_geojson(&report.markers, &state.config.map),
        results: report.rows,
        warnings: report.warnings,
    })
}

#[derive(Deserialize)]
struct DistrictQueryParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct DistrictResponse {
    lat: f64,
    lon: f64,
    district: DistrictLookup,
}

/// District for a single point (map clicks)
async fn district_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DistrictQueryParams>,
) -> Result<Json<DistrictResponse>, (StatusCode, String)> {
    let point = GeoPoint::new(params.lat, params.lon);
    if !point.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("invalid coordinate ({}, {})", params.lat, params.lon),
        ));
    }

    Ok(Json(DistrictResponse {
        lat: point.lat,
        lon: point.lon,
        district: state.layer.resolve(&point),
    }))
}

#[derive(Deserialize)]
struct BatchRequest {
    /// Pasted table text
    text: String,
    providers: Option<Vec<ProviderId>>,
}

/// Batch geocode a pasted table and return CSV
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let addresses =
        parse_pasted_table(&request.text).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let providers = request
        .providers
        .unwrap_or_else(|| DEFAULT_BATCH_PROVIDERS.to_vec());

    let table = BatchTable::geocode_all(&addresses, &providers, &state.registry).await;
    let csv = batch_csv_string(&table).map_err(|e| {
        tracing::error!("Batch export failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"geocoded_results.csv\"",
            ),
        ],
        csv,
    ))
}
