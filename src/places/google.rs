//! Google Maps web service client: Geocoding API and Places Nearby Search.

use super::client::GeocodingClient;
use super::types::{NearbyResponse, PlaceResult};
use crate::error::{Error, Result, ServiceError};
use crate::geo::Coordinate;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable read by [`GoogleMapsClient::from_env`].
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Transport settings for [`GoogleMapsClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".into(),
            timeout: Duration::from_secs(15),
            user_agent: format!("sunstone/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Status envelope wrapped around every Google web service response.
#[derive(Deserialize, Debug)]
struct Envelope {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

impl Envelope {
    /// `OK` and `ZERO_RESULTS` are successes; anything else is a service error.
    fn into_results(self) -> std::result::Result<Vec<PlaceResult>, ServiceError> {
        if matches!(self.status.as_str(), "OK" | "ZERO_RESULTS") {
            return Ok(self.results);
        }
        Err(ServiceError::Status {
            status: self.status,
            message: self.error_message,
        })
    }
}

/// Blocking HTTP client for the Google Maps web services.
pub struct GoogleMapsClient {
    api_key: String,
    config: ClientConfig,
    agent: ureq::Agent,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self {
            api_key: api_key.into(),
            config,
            agent,
        }
    }

    /// Build a client from `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(Error::UninitializedClient),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Envelope> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        tracing::debug!(%url, ?params, "google maps request");

        let mut request = self.agent.get(&url);
        for (k, v) in params {
            request = request.query(k, v);
        }
        let response = request
            .query("key", &self.api_key)
            .call()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let envelope: Envelope = response
            .into_json()
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        Ok(envelope)
    }
}

fn latlng_param(c: Coordinate) -> String {
    format!("{},{}", c.lat, c.lon)
}

impl GeocodingClient for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<Vec<PlaceResult>> {
        Ok(self.get(GEOCODE_PATH, &[("address", address)])?.into_results()?)
    }

    fn reverse_geocode(&self, at: Coordinate) -> Result<Vec<PlaceResult>> {
        let latlng = latlng_param(at);
        Ok(self.get(GEOCODE_PATH, &[("latlng", latlng.as_str())])?.into_results()?)
    }

    fn places_nearby(&self, location: Coordinate, radius_m: u32) -> Result<NearbyResponse> {
        let loc = latlng_param(location);
        let radius = radius_m.to_string();
        let results = self
            .get(NEARBY_PATH, &[("location", loc.as_str()), ("radius", radius.as_str())])?
            .into_results()?;
        Ok(NearbyResponse { results })
    }
}
