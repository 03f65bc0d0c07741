//! Place resolver: address lookups, business detection, and random nearby
//! house sampling on top of an injected [`GeocodingClient`].
//!
//! Lookup flow:    geocode → canonical address → places within 50 m → exact match
//! Sampling flow:  bounding box → random point → reverse geocode → rooftop + snap check → business check

use super::client::GeocodingClient;
use super::extract::{bundle_result, canonical_address, coordinates_from_result, describe_place};
use super::google::GoogleMapsClient;
use super::types::{AddressBundle, PlaceResult};
use crate::error::{Error, Result};
use crate::geo::{self, Coordinate};
use rand::Rng;
use std::time::Duration;

/// Search radius in metres when matching an address to a place.
pub const NEARBY_RADIUS_M: u32 = 50;

/// Returned by [`PlaceResolver::business_summary`] when a place matched but
/// could not be described.
pub const UNKNOWN_SUMMARY: &str = "UNKNOWN";

/// Options for [`PlaceResolver::random_house`].
#[derive(Debug, Clone)]
pub struct RandomHouseOptions {
    /// Radius of the sampling area around the centre.
    pub radius_km: f64,
    /// Samples drawn before giving up.
    pub max_attempts: usize,
    /// Pause after a sample that did not land on a rooftop address.
    pub retry_delay: Duration,
    /// Maximum gap between the sampled point and the address it snapped to.
    pub max_snap_distance_km: f64,
}

impl Default for RandomHouseOptions {
    fn default() -> Self {
        Self {
            radius_km: 1.0,
            max_attempts: 100,
            retry_delay: Duration::from_millis(500),
            max_snap_distance_km: 0.05,
        }
    }
}

/// Resolves addresses and places through a geocoding client.
///
/// A resolver built without a client answers every lookup with
/// [`Error::UninitializedClient`].
pub struct PlaceResolver<C = GoogleMapsClient> {
    client: Option<C>,
}

impl PlaceResolver<GoogleMapsClient> {
    /// Resolver backed by Google Maps. A blank key leaves it uninitialized.
    pub fn init(api_key: &str) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("empty API key; place lookups will fail until a key is provided");
            return Self { client: None };
        }
        Self {
            client: Some(GoogleMapsClient::new(api_key)),
        }
    }

    /// Resolver backed by Google Maps with the key from `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            client: GoogleMapsClient::from_env().ok(),
        }
    }
}

impl<C: GeocodingClient> PlaceResolver<C> {
    pub fn with_client(client: C) -> Self {
        Self { client: Some(client) }
    }

    pub fn uninitialized() -> Self {
        Self { client: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&C> {
        self.client.as_ref().ok_or(Error::UninitializedClient)
    }

    fn first_geocode(&self, address: &str) -> Result<PlaceResult> {
        self.client()?
            .geocode(address)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(address.to_string()))
    }

    /// Geocode an address into an [`AddressBundle`].
    pub fn bundle_address(&self, address: &str) -> Result<AddressBundle> {
        Ok(bundle_result(&self.first_geocode(address)?))
    }

    pub fn coordinates_at_address(&self, address: &str) -> Result<Coordinate> {
        Ok(coordinates_from_result(&self.first_geocode(address)?))
    }

    /// The place within [`NEARBY_RADIUS_M`] of an address whose canonical
    /// address is exactly the geocoded one.
    pub fn place_at_address(&self, address: &str) -> Result<PlaceResult> {
        let result = self.first_geocode(address)?;
        let at = coordinates_from_result(&result);
        let canonical = canonical_address(&result)?;

        let nearby = self.client()?.places_nearby(at, NEARBY_RADIUS_M)?;
        tracing::debug!(
            %canonical,
            places = %serde_json::to_string_pretty(&nearby.results).unwrap_or_default(),
            "nearby places"
        );

        nearby
            .results
            .into_iter()
            .find(|place| canonical_address(place).is_ok_and(|a| a == canonical))
            .ok_or_else(|| Error::NotFound(address.to_string()))
    }

    /// `Some("Name: X, Type: Y")` when a place sits at the address, `None`
    /// otherwise.
    ///
    /// A matched place that cannot be described yields `"UNKNOWN"`; service
    /// failures still propagate.
    pub fn business_summary(&self, address: &str) -> Result<Option<String>> {
        let place = match self.place_at_address(address) {
            Ok(place) => place,
            Err(Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let summary = describe_place(&place).unwrap_or_else(|e| {
            tracing::warn!(address, error = %e, "could not summarize place");
            UNKNOWN_SUMMARY.to_string()
        });
        Ok(Some(summary))
    }

    /// A random residential address near `center`, using the thread RNG.
    pub fn random_house(&self, center: &AddressBundle, opts: &RandomHouseOptions) -> Result<AddressBundle> {
        self.random_house_with_rng(center, opts, &mut rand::thread_rng())
    }

    /// Rejection-sample points in the box around `center` until one
    /// reverse-geocodes to a rooftop address close to the sample that is not
    /// a business.
    pub fn random_house_with_rng<R: Rng>(
        &self,
        center: &AddressBundle,
        opts: &RandomHouseOptions,
        rng: &mut R,
    ) -> Result<AddressBundle> {
        let client = self.client()?;
        let origin = Coordinate::checked(center.lat, center.lon)?;
        let area = geo::bounds(origin.lat, origin.lon, opts.radius_km)?;
        let (lat_lo, lat_hi) = area.lat_range();
        let (lon_lo, lon_hi) = area.lon_range();

        for attempt in 1..=opts.max_attempts {
            let sample = Coordinate::new(rng.gen_range(lat_lo..=lat_hi), rng.gen_range(lon_lo..=lon_hi));
            let candidate = client.reverse_geocode(sample)?.into_iter().next();

            match candidate {
                Some(result)
                    if result.is_rooftop()
                        && sample.distance_km(&coordinates_from_result(&result)) < opts.max_snap_distance_km =>
                {
                    let house = bundle_result(&result);
                    match self.business_summary(&house.address)? {
                        Some(summary) => {
                            // Could still be a home business; no zoning data to tell.
                            tracing::debug!(attempt, address = %house.address, %summary, "skipping business");
                            continue;
                        }
                        None => {
                            tracing::debug!(attempt, address = %house.full_address, "found house");
                            return Ok(house);
                        }
                    }
                }
                Some(result) => {
                    tracing::debug!(
                        attempt,
                        %sample,
                        location_type = ?result.geometry.location_type,
                        "sample did not snap to a rooftop address"
                    );
                }
                None => tracing::debug!(attempt, %sample, "no address at sample"),
            }

            if attempt < opts.max_attempts {
                std::thread::sleep(opts.retry_delay);
            }
        }

        Err(Error::RetryExhausted {
            attempts: opts.max_attempts,
        })
    }
}
