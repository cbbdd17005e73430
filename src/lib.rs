//! geoxval - cross-validate addresses against several geocoding providers
//!
//! This library provides shared types and modules for the geocode, batch
//! and serve binaries.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod render;
pub mod spatial;

pub use aggregate::{aggregate, Aggregation, Warning};
pub use models::{GeoPoint, GeocodeResult, MarkerColor, ProviderId, Source};
