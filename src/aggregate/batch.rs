//! Batch geocoding of a pasted address table.
//!
//! Unlike the interactive flow every address goes to every selected
//! provider verbatim, and misses are kept as empty cells.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{info, warn};

use super::Warning;
use crate::models::{GeoPoint, ProviderId};
use crate::providers::ProviderRegistry;

/// Providers queried in batch mode when none are selected
pub const DEFAULT_BATCH_PROVIDERS: &[ProviderId] =
    &[ProviderId::Nominatim, ProviderId::ArcGis, ProviderId::Photon];

/// One input address with one optional point per provider column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub address: String,
    pub points: Vec<Option<GeoPoint>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchTable {
    /// Column order for `BatchRow::points`
    pub providers: Vec<ProviderId>,
    pub rows: Vec<BatchRow>,
    pub warnings: Vec<Warning>,
}

impl BatchTable {
    pub fn new(providers: &[ProviderId]) -> Self {
        let mut providers = providers.to_vec();
        providers.sort();
        providers.dedup();
        Self {
            providers,
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Geocode one address with every column provider and append the row
    pub async fn geocode_row(&mut self, address: &str, registry: &ProviderRegistry) {
        let mut points = Vec::with_capacity(self.providers.len());

        for &provider_id in &self.providers {
            let point = match registry.get(provider_id) {
                Some(provider) => match provider.geocode(address).await {
                    Ok(point) => point,
                    Err(e) => {
                        warn!("{}", e);
                        self.warnings.push(Warning::ProviderFailed {
                            input: address.to_string(),
                            provider: provider_id,
                            message: e.to_string(),
                        });
                        None
                    }
                },
                None => {
                    let warning = Warning::ProviderUnavailable {
                        provider: provider_id,
                    };
                    if !self.warnings.contains(&warning) {
                        self.warnings.push(warning);
                    }
                    None
                }
            };
            points.push(point);
        }

        self.rows.push(BatchRow {
            address: address.to_string(),
            points,
        });
    }

    /// Geocode all addresses in order
    pub async fn geocode_all(
        addresses: &[String],
        providers: &[ProviderId],
        registry: &ProviderRegistry,
    ) -> Self {
        let mut table = Self::new(providers);
        for address in addresses {
            table.geocode_row(address, registry).await;
        }
        info!(
            "Batch geocoded {} addresses with {} providers",
            table.rows.len(),
            table.providers.len()
        );
        table
    }
}

/// Extract addresses from pasted table text.
///
/// Tab-separated input (a spreadsheet paste) uses the first column;
/// anything else is one address per line. A leading "Address" header is
/// dropped.
pub fn parse_pasted_table(text: &str) -> Result<Vec<String>> {
    let mut addresses: Vec<String> = if text.contains('\t') {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b'\t')
            .from_reader(text.as_bytes());

        let mut out = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to parse pasted table")?;
            if let Some(cell) = record.get(0) {
                out.push(cell.trim().to_string());
            }
        }
        out
    } else {
        text.lines().map(|l| l.trim().to_string()).collect()
    };

    addresses.retain(|a| !a.is_empty());

    if addresses
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case("address"))
    {
        addresses.remove(0);
    }

    Ok(addresses)
}
