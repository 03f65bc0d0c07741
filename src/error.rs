//! Error types shared by the geodesy and place-lookup modules.

use thiserror::Error;

/// Failures talking to the remote geocoding service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// The service answered, but with a non-OK status such as
    /// `OVER_QUERY_LIMIT` or `REQUEST_DENIED`.
    #[error("service returned {status}{}", detail(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Which corner of a bounding box a convergence failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    NorthEast,
    SouthWest,
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NorthEast => write!(f, "northeast"),
            Self::SouthWest => write!(f, "southwest"),
        }
    }
}

/// Errors produced by `sunstone`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("geocoding client not initialized; build the resolver with an API key first")]
    UninitializedClient,

    #[error("no match found for '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(
        "{corner} corner did not converge after {iterations} iterations \
         (last distance {distance_km:.4} km, target {radius_km} km)"
    )]
    Convergence {
        corner: Corner,
        iterations: usize,
        distance_km: f64,
        radius_km: f64,
    },

    #[error("no suitable house found after {attempts} attempts")]
    RetryExhausted { attempts: usize },

    #[error("place record field `{0}` has an unexpected type")]
    MalformedField(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
