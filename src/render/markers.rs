//! Map markers built from result groups.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::MapConfig;
use crate::models::{GeoPoint, MarkerColor};
use crate::spatial::{DistrictLayer, DistrictLookup, ResultGroup};

/// One pin on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub color: MarkerColor,
    pub district: DistrictLookup,
    /// HTML tooltip/popup text
    pub tooltip: String,
    pub members: usize,
}

fn tooltip(group: &ResultGroup<'_>, district: &DistrictLookup) -> String {
    let mut lines = Vec::with_capacity(group.len() + 1);
    lines.push(format!("District: {}", district));
    for item in &group.members {
        lines.push(format!(
            "Input: {}<br>{}: ({:.4}, {:.4})",
            item.input, item.source, item.point.lat, item.point.lon
        ));
    }
    lines.join("<br><br>")
}

/// One marker per group, placed and district-resolved at the centroid
pub fn build_markers(groups: &[ResultGroup<'_>], layer: &DistrictLayer) -> Vec<Marker> {
    groups
        .iter()
        .map(|group| {
            let position = group.centroid();
            let district = layer.resolve(&position);
            Marker {
                position,
                color: group.color(),
                tooltip: tooltip(group, &district),
                district,
                members: group.len(),
            }
        })
        .collect()
}

/// GeoJSON FeatureCollection for a map front end, with the initial view
pub fn markers_to_geojson(markers: &[Marker], view: &MapConfig) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.position.lon, m.position.lat],
                },
                "properties": {
                    "marker-color": m.color,
                    "tooltip": m.tooltip,
                    "district": m.district,
                    "members": m.members,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
        "view": {
            "center": view.center,
            "zoom": view.zoom,
        },
        "generated_at": Utc::now().to_rfc3339(),
    })
}
