//! Geocoding provider adapters.
//!
//! Each adapter turns an address into at most one point. Adapters are
//! registered in a [`ProviderRegistry`] keyed by [`ProviderId`], and the
//! aggregator only ever reaches them through that table.

mod arcgis;
mod http;
mod nominatim;
mod opencage;
mod photon;

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::GeocodeError;
use crate::models::{GeoPoint, ProviderId};

pub use arcgis::ArcGisProvider;
pub use http::HttpSettings;
pub use nominatim::NominatimProvider;
pub use opencage::OpenCageProvider;
pub use photon::PhotonProvider;

/// One external geocoding service
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Resolve `address`; `Ok(None)` means the service answered with no match
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// Lookup table from provider id to adapter
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderId, Box<dyn GeocodeProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every adapter the configuration allows.
    ///
    /// OpenCage is skipped when no API key is available.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let settings = HttpSettings::from_config(&config.geocoding);
        let client = settings.build_client()?;

        let mut registry = Self::new();
        for &id in ProviderId::all() {
            let provider = config.providers.get(id);
            let base_url = provider.base_url.clone();
            match id {
                ProviderId::Nominatim => {
                    registry.register(NominatimProvider::new(client.clone(), base_url)?)
                }
                ProviderId::ArcGis => {
                    registry.register(ArcGisProvider::new(client.clone(), base_url)?)
                }
                ProviderId::Photon => {
                    registry.register(PhotonProvider::new(client.clone(), base_url)?)
                }
                ProviderId::OpenCage => match &provider.api_key {
                    Some(key) => registry.register(OpenCageProvider::new(
                        client.clone(),
                        base_url,
                        key.clone(),
                    )?),
                    None => warn!("OpenCage disabled: no API key configured"),
                },
            }
        }

        info!(
            "Registered {} geocoding providers (timeout {}s)",
            registry.len(),
            config.geocoding.timeout_secs
        );
        Ok(registry)
    }

    pub fn register<P: GeocodeProvider + 'static>(&mut self, provider: P) {
        self.adapters.insert(provider.id(), Box::new(provider));
    }

    pub fn get(&self, id: ProviderId) -> Option<&dyn GeocodeProvider> {
        self.adapters.get(&id).map(|p| p.as_ref())
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.adapters.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opencage_requires_key() {
        let mut config = Config::default();
        config.providers.opencage.api_key = None;
        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(registry.contains(ProviderId::Nominatim));
        assert!(registry.contains(ProviderId::ArcGis));
        assert!(registry.contains(ProviderId::Photon));
        assert!(!registry.contains(ProviderId::OpenCage));

        config.providers.opencage.api_key = Some("test-key".to_string());
        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.get(ProviderId::OpenCage).map(|p| p.id()),
            Some(ProviderId::OpenCage)
        );
    }
}
