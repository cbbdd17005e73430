//! OpenStreetMap Nominatim adapter.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{checked_point, endpoint, get_json, resolve_base_url};
use super::GeocodeProvider;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

pub struct NominatimProvider {
    client: Client,
    base_url: Url,
}

impl NominatimProvider {
    pub fn new(client: Client, base_url: Option<Url>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: resolve_base_url(base_url, DEFAULT_BASE_URL)?,
        })
    }
}

fn parse_coord(raw: &str, what: &str) -> Result<f64, GeocodeError> {
    raw.trim().parse().map_err(|_| {
        GeocodeError::unexpected(ProviderId::Nominatim, format!("bad {} '{}'", what, raw))
    })
}

fn parse_places(places: &[NominatimPlace]) -> Result<Option<GeoPoint>, GeocodeError> {
    let Some(place) = places.first() else {
        return Ok(None);
    };

    let lat = parse_coord(&place.lat, "lat")?;
    let lon = parse_coord(&place.lon, "lon")?;

    checked_point(ProviderId::Nominatim, lat, lon).map(Some)
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = endpoint(self.id(), &self.base_url, &["search"])?;
        let places: Vec<NominatimPlace> = get_json(
            &self.client,
            self.id(),
            url,
            &[("q", address), ("format", "jsonv2"), ("limit", "1")],
        )
        .await?;

        parse_places(&places)
    }
}
