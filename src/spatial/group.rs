//! Proximity grouping of geocode results.

use hashbrown::HashMap;

use crate::models::{GeoPoint, GeocodeResult, MarkerColor};

/// Decimal places used when none is configured
pub const DEFAULT_PRECISION: u32 = 5;

/// Finest supported precision; `180 * 10^15` still fits an `i64`
pub const MAX_PRECISION: u32 = 15;

/// Rounded (lat, lon) scaled to integers
pub type GroupKey = (i64, i64);

/// Results whose coordinates round to the same key
#[derive(Debug, Clone)]
pub struct ResultGroup<'a> {
    pub members: Vec<&'a GeocodeResult>,
}

impl<'a> ResultGroup<'a> {
    /// Arithmetic mean of member latitudes and longitudes
    pub fn centroid(&self) -> GeoPoint {
        centroid(&self.members)
    }

    /// Single-member groups keep their source color; shared markers are black
    pub fn color(&self) -> MarkerColor {
        match self.members.as_slice() {
            [only] => only.color,
            _ => MarkerColor::Black,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Round a point to `precision` decimal places as integer pair.
///
/// Precision is clamped to [`MAX_PRECISION`].
pub fn group_key(point: &GeoPoint, precision: u32) -> GroupKey {
    let scale = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    (
        (point.lat * scale).round() as i64,
        (point.lon * scale).round() as i64,
    )
}

/// Partition `results` by rounded coordinates.
///
/// Groups come back in order of first appearance and members keep input
/// order.
pub fn group(results: &[GeocodeResult], precision: u32) -> Vec<ResultGroup<'_>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ResultGroup<'_>> = Vec::new();

    for result in results {
        let key = group_key(&result.point, precision);
        match index.get(&key) {
            Some(&i) => groups[i].members.push(result),
            None => {
                index.insert(key, groups.len());
                groups.push(ResultGroup {
                    members: vec![result],
                });
            }
        }
    }

    groups
}

/// Mean position of `members`; an empty slice yields (0, 0)
pub fn centroid(members: &[&GeocodeResult]) -> GeoPoint {
    if members.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = members.len() as f64;
    let lat = members.iter().map(|r| r.point.lat).sum::<f64>() / n;
    let lon = members.iter().map(|r| r.point.lon).sum::<f64>() / n;
    GeoPoint::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderId, Source};

    fn result(input: &str, lat: f64, lon: f64, source: Source) -> GeocodeResult {
        GeocodeResult::new(input, GeoPoint::new(lat, lon), source)
    }

    #[test]
    fn test_singleton_centroid_is_exact() {
        let results = vec![result("37.7749,-122.4194", 37.7749, -122.4194, Source::Coordinate)];
        let groups = group(&results, DEFAULT_PRECISION);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].centroid(), GeoPoint::new(37.7749, -122.4194));
        assert_eq!(groups[0].color(), MarkerColor::Green);
    }

    #[test]
    fn test_distinct_keys_stay_apart() {
        let results = vec![
            result("x", 38.0, -92.0, Source::Provider(ProviderId::Nominatim)),
            result("x", 38.00001, -92.00001, Source::Provider(ProviderId::ArcGis)),
        ];
        let groups = group(&results, 5);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].color(), MarkerColor::Blue);
        assert_eq!(groups[1].color(), MarkerColor::Red);
    }

    #[test]
    fn test_matching_keys_merge() {
        let results = vec![
            result("x", 38.0, -92.0, Source::Provider(ProviderId::Nominatim)),
            result("x", 38.000001, -92.000001, Source::Provider(ProviderId::ArcGis)),
        ];
        let groups = group(&results, 5);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].color(), MarkerColor::Black);

        let c = groups[0].centroid();
        assert!((c.lat - 38.0000005).abs() < 1e-12);
        assert!((c.lon + 92.0000005).abs() < 1e-12);
    }

    #[test]
    fn test_coarser_precision_merges_more() {
        let results = vec![
            result("x", 38.0, -92.0, Source::Provider(ProviderId::Nominatim)),
            result("x", 38.00001, -92.00001, Source::Provider(ProviderId::ArcGis)),
        ];
        assert_eq!(group(&results, 4).len(), 1);
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let results = vec![
            result("a", 38.57670, -92.17350, Source::Provider(ProviderId::Nominatim)),
            result("b", 39.09970, -94.57860, Source::Provider(ProviderId::ArcGis)),
            result("a", 38.576701, -92.173501, Source::Provider(ProviderId::Photon)),
            result("c", 37.08420, -94.51330, Source::Coordinate),
            result("b", 39.099702, -94.578598, Source::Provider(ProviderId::OpenCage)),
        ];
        let groups = group(&results, DEFAULT_PRECISION);

        let total: usize = groups.iter().map(ResultGroup::len).sum();
        assert_eq!(total, results.len());

        for r in &results {
            let owners = groups
                .iter()
                .filter(|g| g.members.iter().any(|m| std::ptr::eq(*m, r)))
                .count();
            assert_eq!(owners, 1);
        }

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].members[0].input, "a");
        assert_eq!(groups[1].members[0].input, "b");
        assert_eq!(groups[2].members[0].input, "c");
    }

    #[test]
    fn test_group_key_rounding() {
        assert_eq!(group_key(&GeoPoint::new(38.123456, -92.654321), 5), (3812346, -9265432));
        assert_eq!(group_key(&GeoPoint::new(38.5, -92.5), 0), (39, -93));
    }

    #[test]
    fn test_high_precision_keeps_distant_points_apart() {
        let results = vec![
            result("jefferson city", 38.5767, -92.1735, Source::Coordinate),
            result("kansas city", 39.0997, -94.5786, Source::Coordinate),
        ];
        for precision in [MAX_PRECISION, MAX_PRECISION + 3, 400, u32::MAX] {
            assert_eq!(group(&results, precision).len(), 2, "precision {}", precision);
        }
        assert_eq!(
            group_key(&GeoPoint::new(-90.0, 180.0), u32::MAX),
            group_key(&GeoPoint::new(-90.0, 180.0), MAX_PRECISION)
        );
        assert_eq!(
            group_key(&GeoPoint::new(-90.0, 180.0), MAX_PRECISION),
            (-90_000_000_000_000_000, 180_000_000_000_000_000)
        );
    }
}
