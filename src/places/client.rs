//! The geocoding capability the resolver depends on.

use super::types::{NearbyResponse, PlaceResult};
use crate::error::Result;
use crate::geo::Coordinate;

/// A geocoding provider that resolves addresses to places and back, and lists
/// places around a point. Calls block until the full response is in.
pub trait GeocodingClient {
    /// Forward geocode an address string.
    fn geocode(&self, address: &str) -> Result<Vec<PlaceResult>>;

    /// Reverse geocode a point.
    fn reverse_geocode(&self, at: Coordinate) -> Result<Vec<PlaceResult>>;

    /// Places within `radius_m` metres of `location`.
    fn places_nearby(&self, location: Coordinate, radius_m: u32) -> Result<NearbyResponse>;
}
