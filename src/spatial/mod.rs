//! Spatial resolution: proximity grouping and point-in-polygon district
//! lookup.

mod boundary;
mod group;
mod service;

pub use boundary::{load_districts, parse_districts, DistrictPolygon};
pub use group::{
    centroid, group, group_key, GroupKey, ResultGroup, DEFAULT_PRECISION, MAX_PRECISION,
};
pub use service::{resolve_district, DistrictLayer, DistrictLookup};
