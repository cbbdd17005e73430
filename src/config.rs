//! TOML configuration shared by all binaries.
//!
//! Every section is optional; an empty file (or no file) yields the
//! public endpoints and defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::models::ProviderId;

pub const OPENCAGE_KEY_ENV: &str = "OPENCAGE_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub geocoding: GeocodingConfig,
    pub providers: ProvidersConfig,
    pub districts: DistrictsConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Decimal places used to merge near-identical results
    pub precision: u32,
    /// Per-request HTTP timeout for every provider
    pub timeout_secs: u64,
    pub user_agent: String,
    pub default_providers: Vec<ProviderId>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            precision: 5,
            timeout_secs: 10,
            user_agent: concat!("geoxval/", env!("CARGO_PKG_VERSION")).to_string(),
            default_providers: ProviderId::all().to_vec(),
        }
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-provider overrides; unset fields use the public endpoint
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: Option<Url>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub nominatim: ProviderConfig,
    pub arcgis: ProviderConfig,
    pub photon: ProviderConfig,
    pub opencage: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::Nominatim => &self.nominatim,
            ProviderId::ArcGis => &self.arcgis,
            ProviderId::Photon => &self.photon,
            ProviderId::OpenCage => &self.opencage,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DistrictsConfig {
    /// GeoJSON FeatureCollection of district polygons
    pub path: Option<PathBuf>,
    /// Feature property holding the district identifier
    pub id_field: String,
}

impl Default for DistrictsConfig {
    fn default() -> Self {
        Self {
            path: None,
            id_field: "CD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view center as [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [38.5767, -92.1735],
            zoom: 5,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Fill the OpenCage key from the environment when the file has none
    pub fn apply_env(&mut self) {
        self.fill_opencage_key(std::env::var(OPENCAGE_KEY_ENV).ok());
    }

    fn fill_opencage_key(&mut self, from_env: Option<String>) {
        let opencage = &mut self.providers.opencage;
        if opencage.api_key.is_some() {
            return;
        }
        opencage.api_key = from_env
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
    }
}
