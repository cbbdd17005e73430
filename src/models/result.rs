//! Geocoding results as produced by the aggregator.

use serde::{Deserialize, Serialize};

use super::{MarkerColor, ProviderId};

/// Geographic point (lat/lon, WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components finite and inside the WGS84 range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Convert to a `geo` point (x = lon, y = lat)
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Literal "lat,lon" input
    Coordinate,
    Provider(ProviderId),
}

impl Source {
    pub fn color(&self) -> MarkerColor {
        match self {
            Source::Coordinate => MarkerColor::Green,
            Source::Provider(p) => p.color(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Coordinate => f.write_str("Coordinate"),
            Source::Provider(p) => write!(f, "{}", p),
        }
    }
}

/// A single successful geocode (or parsed coordinate literal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Input line as typed (trimmed)
    pub input: String,
    pub point: GeoPoint,
    pub source: Source,
    pub color: MarkerColor,
}

impl GeocodeResult {
    pub fn new(input: &str, point: GeoPoint, source: Source) -> Self {
        Self {
            input: input.to_string(),
            point,
            source,
            color: source.color(),
        }
    }
}
