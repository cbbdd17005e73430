//! Marker, table and CSV output.

pub mod export;
pub mod markers;
pub mod report;
pub mod table;

use serde::Serialize;

use crate::models::{MarkerColor, ProviderId, Source};

pub use export::{batch_csv_string, batch_headers, write_batch_csv};
pub use markers::{build_markers, markers_to_geojson, Marker};
pub use report::Report;
pub use table::{describe_click, format_table, result_rows, write_rows_csv, ResultRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: MarkerColor,
}

/// Color legend: one entry per provider, then literals and overlaps
pub fn legend() -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = ProviderId::all()
        .iter()
        .map(|p| LegendEntry {
            label: p.display_name().to_string(),
            color: p.color(),
        })
        .collect();
    entries.push(LegendEntry {
        label: "Direct Coordinates".to_string(),
        color: Source::Coordinate.color(),
    });
    entries.push(LegendEntry {
        label: "Overlapping Markers".to_string(),
        color: MarkerColor::Black,
    });
    entries
}

/// Legend as display lines, e.g. "Nominatim: blue"
pub fn legend_lines() -> Vec<String> {
    legend()
        .iter()
        .map(|e| format!("{}: {}", e.label, e.color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend() {
        let lines = legend_lines();
        assert_eq!(lines.first().map(String::as_str), Some("Nominatim: blue"));
        assert!(lines.contains(&"Direct Coordinates: green".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Overlapping Markers: black"));
        assert_eq!(lines.len(), ProviderId::all().len() + 2);
    }
}
