//! Provider identifiers and marker colors.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Geocoding providers known to the aggregator.
///
/// Declaration order is the order providers are queried in and the column
/// order of batch exports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenStreetMap Nominatim search API
    Nominatim,
    /// Esri ArcGIS World Geocoding Service
    #[serde(rename = "arcgis")]
    #[value(name = "arcgis")]
    ArcGis,
    /// Komoot Photon (OSM data, GeoJSON responses)
    Photon,
    /// OpenCage geocoding API (requires a key)
    #[serde(rename = "opencage")]
    #[value(name = "opencage")]
    OpenCage,
}

impl ProviderId {
    /// All providers in query order
    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::Nominatim,
            ProviderId::ArcGis,
            ProviderId::Photon,
            ProviderId::OpenCage,
        ]
    }

    /// Human-readable name used in tooltips, tables and CSV headers
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Nominatim => "Nominatim",
            ProviderId::ArcGis => "ArcGIS",
            ProviderId::Photon => "Photon",
            ProviderId::OpenCage => "OpenCage",
        }
    }

    /// Marker color for results from this provider
    pub fn color(&self) -> MarkerColor {
        match self {
            ProviderId::Nominatim => MarkerColor::Blue,
            ProviderId::ArcGis => MarkerColor::Red,
            ProviderId::Photon => MarkerColor::Purple,
            ProviderId::OpenCage => MarkerColor::Orange,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown provider '{0}'")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ProviderId::all()
            .iter()
            .copied()
            .find(|p| p.display_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownProvider(needle.to_string()))
    }
}

/// Marker colors understood by the map front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Blue,
    Red,
    Purple,
    Orange,
    /// Several results share one marker
    Black,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Green => "green",
            MarkerColor::Blue => "blue",
            MarkerColor::Red => "red",
            MarkerColor::Purple => "purple",
            MarkerColor::Orange => "orange",
            MarkerColor::Black => "black",
        }
    }
}

impl std::fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("arcgis".parse::<ProviderId>().unwrap(), ProviderId::ArcGis);
        assert_eq!(" OpenCage ".parse::<ProviderId>().unwrap(), ProviderId::OpenCage);
        assert!("GoogleMaps".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: std::collections::HashSet<_> =
            ProviderId::all().iter().map(|p| p.color()).collect();
        assert_eq!(colors.len(), ProviderId::all().len());
        assert!(!colors.contains(&MarkerColor::Green));
        assert!(!colors.contains(&MarkerColor::Black));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ProviderId::ArcGis).unwrap();
        assert_eq!(json, "\"arcgis\"");
        let id: ProviderId = serde_json::from_str("\"opencage\"").unwrap();
        assert_eq!(id, ProviderId::OpenCage);
    }
}
