//! Multi-provider geocode aggregation.
//!
//! Every submission produces a fresh [`Aggregation`]; there is no state
//! carried between calls.

pub mod batch;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::{GeoPoint, GeocodeResult, ProviderId, Source};
use crate::providers::ProviderRegistry;

/// What a single input line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// "lat,lon" literal
    Coordinate(GeoPoint),
    /// Looked like numbers but was not a usable lat/lon pair
    MalformedCoordinate,
    Address(&'a str),
}

/// Classify a trimmed input line.
///
/// A line is a coordinate literal when it contains a comma and every
/// comma-separated token is a finite number.
pub fn classify(line: &str) -> LineKind<'_> {
    if !line.contains(',') {
        return LineKind::Address(line);
    }

    let numbers: Option<Vec<f64>> = line
        .split(',')
        .map(|token| token.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    match numbers.as_deref() {
        None => LineKind::Address(line),
        Some([lat, lon]) => {
            let point = GeoPoint::new(*lat, *lon);
            if point.is_valid() {
                LineKind::Coordinate(point)
            } else {
                LineKind::MalformedCoordinate
            }
        }
        Some(_) => LineKind::MalformedCoordinate,
    }
}

/// Non-fatal problem reported alongside results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    MalformedCoordinate { input: String },
    ProviderFailed {
        input: String,
        provider: ProviderId,
        message: String,
    },
    ProviderUnavailable { provider: ProviderId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MalformedCoordinate { input } => write!(f, "Invalid coordinate: {}", input),
            Warning::ProviderFailed {
                input,
                provider,
                message,
            } => write!(f, "{} error for {}: {}", provider, input, message),
            Warning::ProviderUnavailable { provider } => {
                write!(f, "{} is selected but not configured", provider)
            }
        }
    }
}

/// Outcome of one aggregation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    pub results: Vec<GeocodeResult>,
    pub warnings: Vec<Warning>,
}

/// Read submission text from `path`, or from stdin when none is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Trim lines and drop empty ones
pub fn input_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Run every line through coordinate parsing or the enabled providers.
///
/// Providers are queried in [`ProviderId`] order, one at a time.
pub async fn aggregate<'a, I>(
    lines: I,
    enabled: &BTreeSet<ProviderId>,
    registry: &ProviderRegistry,
) -> Aggregation
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Aggregation::default();
    let mut reported_unavailable: HashSet<ProviderId> = HashSet::new();

    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            LineKind::Coordinate(point) => {
                out.results
                    .push(GeocodeResult::new(line, point, Source::Coordinate));
            }
            LineKind::MalformedCoordinate => {
                warn!("Invalid coordinate: {}", line);
                out.warnings.push(Warning::MalformedCoordinate {
                    input: line.to_string(),
                });
            }
            LineKind::Address(address) => {
                for &provider_id in enabled {
                    let Some(provider) = registry.get(provider_id) else {
                        if reported_unavailable.insert(provider_id) {
                            warn!("{} selected but not registered", provider_id);
                            out.warnings
                                .push(Warning::ProviderUnavailable { provider: provider_id });
                        }
                        continue;
                    };

                    match provider.geocode(address).await {
                        Ok(Some(point)) => {
                            debug!(
                                "{} -> ({}, {}) for {}",
                                provider_id, point.lat, point.lon, address
                            );
                            out.results.push(GeocodeResult::new(
                                address,
                                point,
                                Source::Provider(provider_id),
                            ));
                        }
                        Ok(None) => debug!("{} found no match for {}", provider_id, address),
                        Err(e) => {
                            warn!("{}", e);
                            out.warnings.push(Warning::ProviderFailed {
                                input: address.to_string(),
                                provider: provider_id,
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    info!(
        "Aggregated {} results with {} warnings",
        out.results.len(),
        out.warnings.len()
    );
    out
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process providers for aggregation tests.

    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::error::GeocodeError;
    use crate::models::{GeoPoint, ProviderId};
    use crate::providers::GeocodeProvider;

    pub struct FakeProvider {
        pub id: ProviderId,
        pub answers: HashMap<String, GeoPoint>,
        pub fail_on: Vec<String>,
    }

    impl FakeProvider {
        pub fn new(id: ProviderId) -> Self {
            Self {
                id,
                answers: HashMap::new(),
                fail_on: Vec::new(),
            }
        }

        pub fn answer(mut self, address: &str, lat: f64, lon: f64) -> Self {
            self.answers
                .insert(address.to_string(), GeoPoint::new(lat, lon));
            self
        }

        pub fn failing(mut self, address: &str) -> Self {
            self.fail_on.push(address.to_string());
            self
        }
    }

    #[async_trait]
    impl GeocodeProvider for FakeProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
            if self.fail_on.iter().any(|a| a == address) {
                return Err(GeocodeError::unexpected(self.id, "simulated outage"));
            }
            Ok(self.answers.get(address).copied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::models::MarkerColor;

    fn enabled(ids: &[ProviderId]) -> BTreeSet<ProviderId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "201 W Capitol Ave\n38.5767,-92.1735\n").unwrap();
        let text = read_input(Some(path.as_path())).unwrap();
        assert_eq!(input_lines(&text), vec!["201 W Capitol Ave", "38.5767,-92.1735"]);

        let missing = dir.path().join("missing.txt");
        assert!(read_input(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_classify_coordinates() {
        assert_eq!(
            classify("37.7749,-122.4194"),
            LineKind::Coordinate(GeoPoint::new(37.7749, -122.4194))
        );
        assert_eq!(
            classify("38.5767, -92.1735"),
            LineKind::Coordinate(GeoPoint::new(38.5767, -92.1735))
        );
        assert_eq!(classify("1,2,3"), LineKind::MalformedCoordinate);
        assert_eq!(classify("95.0,10.0"), LineKind::MalformedCoordinate);
    }

    #[test]
    fn test_classify_addresses() {
        assert_eq!(
            classify("201 W Capitol Ave, Jefferson City, MO"),
            LineKind::Address("201 W Capitol Ave, Jefferson City, MO")
        );
        assert_eq!(classify("Springfield"), LineKind::Address("Springfield"));
        assert_eq!(classify("12.5"), LineKind::Address("12.5"));
        assert_eq!(classify("NaN,10.0"), LineKind::Address("NaN,10.0"));
    }

    #[test]
    fn test_input_lines() {
        assert_eq!(input_lines("  a \n\n b\n   \n"), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_coordinate_without_providers() {
        let registry = ProviderRegistry::new();
        let agg = aggregate(["37.7749,-122.4194"], &enabled(&[]), &registry).await;

        assert_eq!(agg.results.len(), 1);
        let r = &agg.results[0];
        assert_eq!(r.point.lat, 37.7749);
        assert_eq!(r.point.lon, -122.4194);
        assert_eq!(r.source, Source::Coordinate);
        assert_eq!(r.color, MarkerColor::Green);
        assert!(agg.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_skip_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register(FakeProvider::new(ProviderId::Nominatim));
        let agg = aggregate(
            ["38.0,-92.0"],
            &enabled(&[ProviderId::Nominatim]),
            &registry,
        )
        .await;
        assert_eq!(agg.results.len(), 1);
        assert_eq!(agg.results[0].source, Source::Coordinate);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            FakeProvider::new(ProviderId::Nominatim)
                .failing("Columbia, MO")
                .answer("Rolla, MO", 37.95, -91.77),
        );
        registry.register(
            FakeProvider::new(ProviderId::ArcGis)
                .answer("Columbia, MO", 38.95, -92.33)
                .answer("Rolla, MO", 37.9514, -91.7713),
        );

        let agg = aggregate(
            ["Columbia, MO", "Rolla, MO"],
            &enabled(&[ProviderId::Nominatim, ProviderId::ArcGis]),
            &registry,
        )
        .await;

        let sources: Vec<(&str, Source)> = agg
            .results
            .iter()
            .map(|r| (r.input.as_str(), r.source))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("Columbia, MO", Source::Provider(ProviderId::ArcGis)),
                ("Rolla, MO", Source::Provider(ProviderId::Nominatim)),
                ("Rolla, MO", Source::Provider(ProviderId::ArcGis)),
            ]
        );
        assert_eq!(agg.warnings.len(), 1);
        assert!(matches!(
            &agg.warnings[0],
            Warning::ProviderFailed { provider: ProviderId::Nominatim, input, .. }
                if input == "Columbia, MO"
        ));
    }

    #[tokio::test]
    async fn test_only_enabled_providers_are_called() {
        let mut registry = ProviderRegistry::new();
        registry.register(FakeProvider::new(ProviderId::Photon).answer("Joplin", 37.08, -94.51));
        registry.register(
            FakeProvider::new(ProviderId::ArcGis).answer("Joplin", 37.0842, -94.5133),
        );

        let agg = aggregate(["Joplin"], &enabled(&[ProviderId::Photon]), &registry).await;
        assert_eq!(agg.results.len(), 1);
        assert_eq!(agg.results[0].source, Source::Provider(ProviderId::Photon));
        assert_eq!(agg.results[0].color, MarkerColor::Purple);
    }

    #[tokio::test]
    async fn test_unavailable_reported_once() {
        let registry = ProviderRegistry::new();
        let agg = aggregate(
            ["A street", "B street"],
            &enabled(&[ProviderId::OpenCage]),
            &registry,
        )
        .await;
        assert!(agg.results.is_empty());
        assert_eq!(
            agg.warnings,
            vec![Warning::ProviderUnavailable {
                provider: ProviderId::OpenCage
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_literal_skipped() {
        let registry = ProviderRegistry::new();
        let agg = aggregate(
            ["1,2,3", "", "  ", "40.0,-90.0"],
            &enabled(&[]),
            &registry,
        )
        .await;
        assert_eq!(agg.results.len(), 1);
        assert_eq!(
            agg.warnings,
            vec![Warning::MalformedCoordinate {
                input: "1,2,3".to_string()
            }]
        );
        assert_eq!(agg.warnings[0].to_string(), "Invalid coordinate: 1,2,3");
    }
}
