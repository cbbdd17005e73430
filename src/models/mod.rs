//! Core data models for the cross-validation pipeline.

pub mod provider;
pub mod result;

pub use provider::{MarkerColor, ProviderId};
pub use result::{GeoPoint, GeocodeResult, Source};
