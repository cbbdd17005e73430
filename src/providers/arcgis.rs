//! Esri ArcGIS World Geocoding Service adapter.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{checked_point, endpoint, get_json, resolve_base_url};
use super::GeocodeProvider;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

const DEFAULT_BASE_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/";

#[derive(Debug, Deserialize)]
struct CandidatesResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    /// ArcGIS reports errors with HTTP 200 and an `error` object
    error: Option<ArcGisError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct ArcGisError {
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

pub struct ArcGisProvider {
    client: Client,
    base_url: Url,
}

impl ArcGisProvider {
    pub fn new(client: Client, base_url: Option<Url>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: resolve_base_url(base_url, DEFAULT_BASE_URL)?,
        })
    }
}

fn parse_candidates(response: CandidatesResponse) -> Result<Option<GeoPoint>, GeocodeError> {
    if let Some(err) = response.error {
        return Err(GeocodeError::unexpected(
            ProviderId::ArcGis,
            format!("error {}: {}", err.code.unwrap_or_default(), err.message),
        ));
    }

    match response.candidates.first() {
        Some(best) => checked_point(ProviderId::ArcGis, best.location.y, best.location.x).map(Some),
        None => Ok(None),
    }
}

#[async_trait]
impl GeocodeProvider for ArcGisProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ArcGis
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = endpoint(self.id(), &self.base_url, &["findAddressCandidates"])?;
        let response: CandidatesResponse = get_json(
            &self.client,
            self.id(),
            url,
            &[
                ("f", "json"),
                ("singleLine", address),
                ("outFields", "Match_addr,Addr_type"),
                ("maxLocations", "1"),
            ],
        )
        .await?;

        parse_candidates(response)
    }
}
