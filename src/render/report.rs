//! Everything a front end needs from one submission.

use serde::Serialize;

use super::{build_markers, result_rows, Marker, ResultRow};
use crate::aggregate::{Aggregation, Warning};
use crate::spatial::{group, DistrictLayer};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub markers: Vec<Marker>,
    pub rows: Vec<ResultRow>,
    pub warnings: Vec<Warning>,
}

impl Report {
    /// Group the aggregation, resolve districts and build table rows
    pub fn build(aggregation: &Aggregation, layer: &DistrictLayer, precision: u32) -> Self {
        let groups = group(&aggregation.results, precision);
        Self {
            markers: build_markers(&groups, layer),
            rows: result_rows(&aggregation.results, layer),
            warnings: aggregation.warnings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, GeocodeResult, MarkerColor, ProviderId, Source};

    #[test]
    fn test_report_from_aggregation() {
        let aggregation = Aggregation {
            results: vec![
                GeocodeResult::new(
                    "x",
                    GeoPoint::new(38.0, -92.0),
                    Source::Provider(ProviderId::Nominatim),
                ),
                GeocodeResult::new(
                    "x",
                    GeoPoint::new(38.00001, -92.00001),
                    Source::Provider(ProviderId::Photon),
                ),
            ],
            warnings: vec![Warning::MalformedCoordinate {
                input: "1,2,3".to_string(),
            }],
        };

        let report = Report::build(&aggregation, &DistrictLayer::Unavailable, 5);
        assert_eq!(report.markers.len(), 2);
        assert_eq!(report.markers[0].color, MarkerColor::Blue);
        assert_eq!(report.markers[1].color, MarkerColor::Purple);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.warnings.len(), 1);

        let merged = Report::build(&aggregation, &DistrictLayer::Unavailable, 4);
        assert_eq!(merged.markers.len(), 1);
        assert_eq!(merged.markers[0].color, MarkerColor::Black);
        assert_eq!(merged.rows.len(), 2);
    }

    #[test]
    fn test_rows_per_point_markers_per_centroid() {
        use crate::render::markers::tests::{district_layer, straddling_results};
        use crate::spatial::DistrictLookup;

        let aggregation = Aggregation {
            results: straddling_results(),
            warnings: Vec::new(),
        };
        let report = Report::build(&aggregation, &district_layer(), 2);

        assert_eq!(report.markers.len(), 1);
        assert_eq!(report.markers[0].district, DistrictLookup::Found("01".to_string()));
        assert_eq!(report.rows[0].district, DistrictLookup::NotFound);
        assert_eq!(report.rows[1].district, DistrictLookup::Found("01".to_string()));
    }
}
