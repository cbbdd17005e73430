//! District lookup for a point.

use geo::Contains;
use serde::{Serialize, Serializer};
use std::path::Path;
use tracing::{debug, error};

use super::boundary::{load_districts, DistrictPolygon};
use crate::config::DistrictsConfig;
use crate::error::DistrictError;
use crate::models::GeoPoint;

/// Result of a district lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistrictLookup {
    Found(String),
    /// The layer is loaded but no polygon contains the point
    NotFound,
    /// The layer could not be loaded
    NoData,
}

impl std::fmt::Display for DistrictLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistrictLookup::Found(id) => f.write_str(id),
            DistrictLookup::NotFound => f.write_str("Not in any district"),
            DistrictLookup::NoData => f.write_str("No district data"),
        }
    }
}

impl Serialize for DistrictLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// District polygons, or the marker that loading failed
#[derive(Debug, Clone)]
pub enum DistrictLayer {
    Loaded(Vec<DistrictPolygon>),
    Unavailable,
}

impl DistrictLayer {
    /// Load the configured layer; any failure degrades to `Unavailable`
    pub fn from_config(config: &DistrictsConfig) -> Self {
        match &config.path {
            Some(path) => Self::load(path, &config.id_field),
            None => Self::from_result(Err(DistrictError::NotConfigured)),
        }
    }

    pub fn load(path: &Path, id_field: &str) -> Self {
        Self::from_result(load_districts(path, id_field))
    }

    fn from_result(result: Result<Vec<DistrictPolygon>, DistrictError>) -> Self {
        match result {
            Ok(polygons) => DistrictLayer::Loaded(polygons),
            Err(e) => {
                error!("Error loading district boundaries: {}", e);
                DistrictLayer::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DistrictLayer::Loaded(_))
    }

    pub fn len(&self) -> usize {
        match self {
            DistrictLayer::Loaded(polygons) => polygons.len(),
            DistrictLayer::Unavailable => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resolve(&self, point: &GeoPoint) -> DistrictLookup {
        resolve_district(point, self)
    }
}

/// Find the first district (in layer order) whose polygon contains `point`.
///
/// Points exactly on a boundary are not contained.
pub fn resolve_district(point: &GeoPoint, layer: &DistrictLayer) -> DistrictLookup {
    let DistrictLayer::Loaded(polygons) = layer else {
        return DistrictLookup::NoData;
    };

    let target = point.to_geo();
    let found = polygons
        .iter()
        .find(|d| d.geometry.contains(&target))
        .map(|d| DistrictLookup::Found(d.id.clone()))
        .unwrap_or(DistrictLookup::NotFound);

    debug!("District lookup at ({}, {}): {}", point.lat, point.lon, found);
    found
}
