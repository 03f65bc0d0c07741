//! Response records from the geocoding and places services, and the flat
//! address bundle derived from them.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision of a geocoded point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rooftop => write!(f, "ROOFTOP"),
            Self::RangeInterpolated => write!(f, "RANGE_INTERPOLATED"),
            Self::GeometricCenter => write!(f, "GEOMETRIC_CENTER"),
            Self::Approximate => write!(f, "APPROXIMATE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
}

/// One entry of a result's `address_components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// A record field the service may send with an unexpected JSON type.
///
/// Keeps one odd field from failing the whole response; the raw value is
/// kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(serde_json::Value),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Malformed(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(v: T) -> Self {
        Self::Valid(v)
    }
}

/// A geocode, reverse-geocode, or nearby-place record.
///
/// Geocode results carry `formatted_address` and `address_components`;
/// places carry `vicinity`, `name` and `types`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Lenient<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Lenient<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl PlaceResult {
    /// A bare record located at `at`, with every optional field empty.
    pub fn at(at: Coordinate) -> Self {
        Self {
            geometry: Geometry {
                location: LatLng { lat: at.lat, lng: at.lon },
                location_type: None,
            },
            formatted_address: None,
            vicinity: None,
            address_components: Vec::new(),
            name: None,
            types: None,
            place_id: None,
        }
    }

    /// The place name, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref()?.valid().map(String::as_str)
    }

    pub fn is_rooftop(&self) -> bool {
        self.geometry.location_type == Some(LocationType::Rooftop)
    }
}

/// Body of a nearby-search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// Flattened view of a geocode result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressBundle {
    /// Street-level part of the formatted address (text before the first comma).
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub full_address: String,
}

impl AddressBundle {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}
