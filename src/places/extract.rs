//! Pure reshaping of service records into flatter structures.

use super::types::{AddressBundle, Lenient, PlaceResult};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use std::collections::BTreeMap;

const UNKNOWN_ADDRESS: &str = "<unknown>";
const UNKNOWN_NAME: &str = "<name unknown>";
const UNKNOWN_TYPE: &str = "unknown";

/// Flatten a geocode result into an [`AddressBundle`].
pub fn bundle_result(result: &PlaceResult) -> AddressBundle {
    let full = result.formatted_address.as_deref().unwrap_or(UNKNOWN_ADDRESS);
    let street = full.split(',').next().unwrap_or(full);
    let at = coordinates_from_result(result);

    AddressBundle {
        address: street.to_string(),
        lat: at.lat,
        lon: at.lon,
        full_address: full.to_string(),
    }
}

pub fn coordinates_from_result(result: &PlaceResult) -> Coordinate {
    let loc = result.geometry.location;
    Coordinate::new(loc.lat, loc.lng)
}

/// Map each address component to its name, keyed by its types joined with `/`
/// (e.g. `"locality/political"`). Later components win on duplicate keys.
pub fn address_parts_from_result(result: &PlaceResult, short: bool) -> BTreeMap<String, String> {
    result
        .address_components
        .iter()
        .map(|c| {
            let name = if short { &c.short_name } else { &c.long_name };
            (c.types.join("/"), name.clone())
        })
        .collect()
}

/// A comparable one-line address: `vicinity` verbatim when present, else
/// `"<street_number> <route>, <locality>"` built from whichever parts exist.
pub fn canonical_address(result: &PlaceResult) -> Result<String> {
    if let Some(vicinity) = &result.vicinity {
        return Ok(vicinity.clone());
    }

    let parts = address_parts_from_result(result, false);
    if parts.is_empty() {
        let label = result
            .formatted_address
            .clone()
            .unwrap_or_else(|| coordinates_from_result(result).to_string());
        return Err(Error::NotFound(label));
    }

    let mut addr = String::new();
    if let Some(number) = parts.get("street_number") {
        addr.push_str(number);
        addr.push(' ');
    }
    if let Some(route) = parts.get("route") {
        addr.push_str(route);
        addr.push_str(", ");
    }
    if let Some(locality) = parts.get("locality/political") {
        addr.push_str(locality);
    }
    Ok(addr)
}

/// `"Name: <name>, Type: <t1, t2>"` for a place record.
///
/// Missing fields fall back to defaults; a `name` that is not a string or a
/// `types` that is not a list of strings is an error.
pub fn describe_place(place: &PlaceResult) -> Result<String> {
    let name = match &place.name {
        None => UNKNOWN_NAME,
        Some(Lenient::Valid(name)) => name.as_str(),
        Some(Lenient::Malformed(_)) => return Err(Error::MalformedField("name")),
    };
    let kinds = match &place.types {
        None => UNKNOWN_TYPE.to_string(),
        Some(Lenient::Valid(types)) => types.join(", "),
        Some(Lenient::Malformed(_)) => return Err(Error::MalformedField("types")),
    };
    Ok(format!("Name: {}, Type: {}", name, kinds))
}
