//! District polygon loading from GeoJSON.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::DistrictError;

/// A single district polygon with its identifier
#[derive(Debug, Clone)]
pub struct DistrictPolygon {
    pub id: String,
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
}

/// Positions are [lon, lat, (alt)]
type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

fn to_line_string(ring: &Ring) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = ring
        .iter()
        .filter_map(|pos| match pos.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect();

    if coords.len() < 3 {
        return None;
    }

    // Close the ring if needed
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }

    if coords.len() < 4 {
        return None;
    }

    Some(LineString::new(coords))
}

fn to_polygon(rings: &[Ring]) -> Option<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = to_line_string(exterior)?;
    let interiors = holes.iter().filter_map(to_line_string).collect();
    Some(Polygon::new(exterior, interiors))
}

impl Geometry {
    fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        let polygons: Vec<Polygon<f64>> = match self {
            Geometry::Polygon { coordinates } => to_polygon(coordinates).into_iter().collect(),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().filter_map(|p| to_polygon(p)).collect()
            }
            Geometry::Unsupported => Vec::new(),
        };

        if polygons.is_empty() {
            None
        } else {
            Some(MultiPolygon::new(polygons))
        }
    }
}

/// Stringify an identifier property (codes are often numeric)
fn property_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a GeoJSON FeatureCollection into district polygons.
///
/// Features without a usable geometry or `id_field` are skipped. Feature
/// order is preserved.
pub fn parse_districts(
    json: &str,
    id_field: &str,
    origin: &str,
) -> Result<Vec<DistrictPolygon>, DistrictError> {
    let collection: FeatureCollection =
        serde_json::from_str(json).map_err(|source| DistrictError::Parse {
            path: origin.to_string(),
            source,
        })?;

    let mut districts = Vec::with_capacity(collection.features.len());

    for (idx, feature) in collection.features.iter().enumerate() {
        let id = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(id_field))
            .and_then(property_id);

        let Some(id) = id else {
            warn!("Feature {} has no '{}' property, skipping", idx, id_field);
            continue;
        };

        let Some(geometry) = feature.geometry.as_ref().and_then(Geometry::to_multi_polygon) else {
            warn!("Feature {} (district {}) has no polygon geometry, skipping", idx, id);
            continue;
        };

        districts.push(DistrictPolygon { id, geometry });
    }

    if districts.is_empty() {
        return Err(DistrictError::Empty {
            path: origin.to_string(),
        });
    }

    Ok(districts)
}

/// Load district polygons from a GeoJSON file
pub fn load_districts(path: &Path, id_field: &str) -> Result<Vec<DistrictPolygon>, DistrictError> {
    info!("Loading district boundaries from {}", path.display());

    let origin = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| DistrictError::Io {
        path: origin.clone(),
        source,
    })?;

    let districts = parse_districts(&content, id_field, &origin)?;
    info!("Loaded {} district polygons", districts.len());
    Ok(districts)
}
