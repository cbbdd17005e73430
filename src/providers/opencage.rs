//! OpenCage adapter.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{checked_point, endpoint, get_json, resolve_base_url};
use super::GeocodeProvider;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/";

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: Option<OpenCageGeometry>,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

pub struct OpenCageProvider {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OpenCageProvider {
    pub fn new(client: Client, base_url: Option<Url>, api_key: String) -> Result<Self> {
        Ok(Self {
            client,
            base_url: resolve_base_url(base_url, DEFAULT_BASE_URL)?,
            api_key,
        })
    }
}

fn parse_results(response: &OpenCageResponse) -> Result<Option<GeoPoint>, GeocodeError> {
    let Some(first) = response.results.first() else {
        return Ok(None);
    };

    match &first.geometry {
        Some(g) => checked_point(ProviderId::OpenCage, g.lat, g.lng).map(Some),
        None => Err(GeocodeError::unexpected(
            ProviderId::OpenCage,
            "result without geometry",
        )),
    }
}

#[async_trait]
impl GeocodeProvider for OpenCageProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenCage
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = endpoint(self.id(), &self.base_url, &["geocode", "v1", "json"])?;
        let response: OpenCageResponse = get_json(
            &self.client,
            self.id(),
            url,
            &[
                ("q", address),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ],
        )
        .await?;

        parse_results(&response)
    }
}
