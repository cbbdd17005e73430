//! Shared HTTP plumbing for the adapters.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::GeocodingConfig;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

/// Client settings applied to every provider
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl HttpSettings {
    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")
    }
}

/// Resolve the adapter base URL, falling back to the public endpoint
pub(crate) fn resolve_base_url(configured: Option<Url>, default: &str) -> Result<Url> {
    match configured {
        Some(url) => Ok(url),
        None => Url::parse(default).with_context(|| format!("Invalid base URL {}", default)),
    }
}

/// Append path segments to a base URL, tolerating a trailing slash
pub(crate) fn endpoint(
    provider: ProviderId,
    base: &Url,
    segments: &[&str],
) -> Result<Url, GeocodeError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GeocodeError::InvalidEndpoint {
            provider,
            base: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET `url` with `query` and decode a JSON body
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: ProviderId,
    url: Url,
    query: &[(&str, &str)],
) -> Result<T, GeocodeError> {
    debug!("{} GET {}", provider, url);

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| GeocodeError::Http { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GeocodeError::Status { provider, status });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| GeocodeError::unexpected(provider, e.to_string()))
}

/// Reject non-finite or out-of-range coordinates from a provider
pub(crate) fn checked_point(
    provider: ProviderId,
    lat: f64,
    lon: f64,
) -> Result<GeoPoint, GeocodeError> {
    let point = GeoPoint::new(lat, lon);
    if point.is_valid() {
        Ok(point)
    } else {
        Err(GeocodeError::unexpected(
            provider,
            format!("coordinates out of range ({}, {})", lat, lon),
        ))
    }
}
