//! Tabular view of geocoded results.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::models::{GeoPoint, GeocodeResult, MarkerColor};
use crate::spatial::{DistrictLayer, DistrictLookup};

/// One table row per result, district resolved at the result's own point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRow {
    pub input: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    pub color: MarkerColor,
    pub district: DistrictLookup,
}

pub fn result_rows(results: &[GeocodeResult], layer: &DistrictLayer) -> Vec<ResultRow> {
    results
        .iter()
        .map(|r| ResultRow {
            input: r.input.clone(),
            latitude: r.point.lat,
            longitude: r.point.lon,
            source: r.source.to_string(),
            color: r.color,
            district: layer.resolve(&r.point),
        })
        .collect()
}

const HEADERS: [&str; 6] = ["Input", "Latitude", "Longitude", "Source", "Color", "District"];

/// Render rows as a left-aligned plain-text table
pub fn format_table(rows: &[ResultRow]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.input.clone(),
                r.latitude.to_string(),
                r.longitude.to_string(),
                r.source.clone(),
                r.color.to_string(),
                r.district.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |row: &[String]| -> String {
        row.iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = vec![render(header.as_slice())];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(cells.iter().map(|row| render(row.as_slice())));
    out.join("\n")
}

/// Write rows as CSV with a header line
pub fn write_rows_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// "Last clicked" line for an independently supplied point
pub fn describe_click(point: &GeoPoint, layer: &DistrictLayer) -> String {
    format!(
        "Last clicked: {}, {} (District: {})",
        point.lat,
        point.lon,
        layer.resolve(point)
    )
}
