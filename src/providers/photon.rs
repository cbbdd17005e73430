//! Photon adapter (OSM-based, answers in GeoJSON).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{checked_point, endpoint, get_json, resolve_base_url};
use super::GeocodeProvider;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

const DEFAULT_BASE_URL: &str = "https://photon.komoot.io/";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: [lon, lat]
    coordinates: Vec<f64>,
}

pub struct PhotonProvider {
    client: Client,
    base_url: Url,
}

impl PhotonProvider {
    pub fn new(client: Client, base_url: Option<Url>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: resolve_base_url(base_url, DEFAULT_BASE_URL)?,
        })
    }
}

fn parse_features(collection: &FeatureCollection) -> Result<Option<GeoPoint>, GeocodeError> {
    let Some(feature) = collection.features.first() else {
        return Ok(None);
    };

    match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => checked_point(ProviderId::Photon, *lat, *lon).map(Some),
        other => Err(GeocodeError::unexpected(
            ProviderId::Photon,
            format!("expected [lon, lat], got {} values", other.len()),
        )),
    }
}

#[async_trait]
impl GeocodeProvider for PhotonProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Photon
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = endpoint(self.id(), &self.base_url, &["api"])?;
        let collection: FeatureCollection = get_json(
            &self.client,
            self.id(),
            url,
            &[("q", address), ("limit", "1")],
        )
        .await?;

        parse_features(&collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let collection: FeatureCollection = serde_json::from_str(body).unwrap();
        parse_features(&collection)
    }

    #[test]
    fn test_lon_lat_order() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-90.1994, 38.6270]},
                "properties": {"name": "St. Louis", "osm_key": "place"}
            }]
        }"#;
        assert_eq!(decode(body).unwrap(), Some(GeoPoint::new(38.6270, -90.1994)));
    }

    #[test]
    fn test_empty_collection() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        assert_eq!(decode(body).unwrap(), None);
    }

    #[test]
    fn test_short_coordinates() {
        let body = r#"{"features": [{"geometry": {"coordinates": [12.5]}}]}"#;
        assert!(decode(body).is_err());
    }
}
