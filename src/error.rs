//! Error types for provider calls and district loading.

use thiserror::Error;

use crate::models::ProviderId;

/// A provider call that did not produce a usable answer.
///
/// None of these abort a run; the aggregator turns them into warnings.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: ProviderId,
        status: reqwest::StatusCode,
    },

    #[error("{provider} returned an unexpected payload: {detail}")]
    UnexpectedPayload {
        provider: ProviderId,
        detail: String,
    },

    #[error("{provider} endpoint cannot be built from base URL {base}")]
    InvalidEndpoint { provider: ProviderId, base: String },
}

impl GeocodeError {
    pub fn unexpected(provider: ProviderId, detail: impl Into<String>) -> Self {
        GeocodeError::UnexpectedPayload {
            provider,
            detail: detail.into(),
        }
    }
}

/// Failure to load the district polygon layer
#[derive(Debug, Error)]
pub enum DistrictError {
    #[error("no district file configured")]
    NotConfigured,

    #[error("failed to read district file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse district file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("district file {path} contains no usable polygons")]
    Empty { path: String },
}
