//! Geodesy helpers and address/place lookups.
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`geo`]    | `Coordinate`, `BoundingBox`, `bearing`, `haversine`, `points_along_line`, `bounds` |
//! | [`places`] | `PlaceResolver`, `GeocodingClient`, `GoogleMapsClient`, response types |
//! | [`error`]  | `Error`, `ServiceError`, `Result<T>`                            |
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the caller.

pub mod error;
pub mod geo;
pub mod places;

pub use error::{Error, Result, ServiceError};
pub use geo::{bearing, bounds, haversine, points_along_line, BoundingBox, BoundsOptions, Coordinate};
pub use places::{AddressBundle, GeocodingClient, GoogleMapsClient, PlaceResolver, RandomHouseOptions};
