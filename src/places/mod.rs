//! Address and place lookups on top of a geocoding service.
//!
//! Provides typed service records, pure reshaping helpers, the
//! [`GeocodingClient`] capability with a Google Maps implementation, and the
//! [`PlaceResolver`] that ties them to the geodesy helpers.

pub mod client;
pub mod extract;
pub mod google;
pub mod resolver;
pub mod types;

pub use client::GeocodingClient;
pub use extract::{address_parts_from_result, bundle_result, canonical_address, coordinates_from_result, describe_place};
pub use google::{ClientConfig, GoogleMapsClient};
pub use resolver::{PlaceResolver, RandomHouseOptions};
pub use types::{AddressBundle, AddressComponent, LocationType, NearbyResponse, PlaceResult};
