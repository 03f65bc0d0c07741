//! Geodesy helpers: rhumb-line bearing, haversine distance, linear
//! interpolation between two points, and a bounding-box estimator.
//!
//! All angles are decimal degrees on input and output; distances are kilometres.

use crate::error::{Corner, Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate without range checks.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate, rejecting values outside lat -90..90 / lon -180..180.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidArgument(format!("latitude {lat} outside -90..90")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidArgument(format!("longitude {lon} outside -180..180")));
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon)
    }

    /// Rhumb-line heading towards `other`.
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        bearing(self.lat, self.lon, other.lat, other.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// Two corners approximating a circle around a centre point.
///
/// The corners come straight out of [`bounds`] and are not guaranteed to be
/// ordered: for a negative longitude the "northeast" corner lies to the west.
/// Use [`BoundingBox::lat_range`] and [`BoundingBox::lon_range`] for sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

impl BoundingBox {
    pub fn lat_range(&self) -> (f64, f64) {
        let (a, b) = (self.northeast.lat, self.southwest.lat);
        (a.min(b), a.max(b))
    }

    pub fn lon_range(&self) -> (f64, f64) {
        let (a, b) = (self.northeast.lon, self.southwest.lon);
        (a.min(b), a.max(b))
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        let (lat_lo, lat_hi) = self.lat_range();
        let (lon_lo, lon_hi) = self.lon_range();
        (lat_lo..=lat_hi).contains(&c.lat) && (lon_lo..=lon_hi).contains(&c.lon)
    }
}

/// Initial heading from point 1 to point 2 along a rhumb line, in [0, 360).
///
/// Crossing the antimeridian takes the shorter way round. Identical points
/// yield 0.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let start_lat = lat1 * DEG;
    let end_lat = lat2 * DEG;
    let mut d_lon = (lon2 - lon1) * DEG;

    let d_phi = ((end_lat / 2.0 + PI / 4.0).tan() / (start_lat / 2.0 + PI / 4.0).tan()).ln();

    if d_lon.abs() > PI {
        d_lon = if d_lon > 0.0 {
            -(2.0 * PI - d_lon)
        } else {
            2.0 * PI + d_lon
        };
    }

    (d_lon.atan2(d_phi) / DEG + 360.0) % 360.0
}

/// Great-circle distance in kilometres on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1 * DEG;
    let lat2 = lat2 * DEG;
    let d_lat = lat2 - lat1;
    let d_lon = (lon2 - lon1) * DEG;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1.0 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// `n` points spaced evenly in lat/lon (not along the geodesic) from point 1
/// to point 2, both ends included.
///
/// One point yields the midpoint, two points yield the endpoints untouched.
pub fn points_along_line(n: usize, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Vec<Coordinate> {
    match n {
        0 => Vec::new(),
        1 => vec![Coordinate::new((lat1 + lat2) / 2.0, (lon1 + lon2) / 2.0)],
        2 => vec![Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2)],
        _ => {
            let lat_step = (lat2 - lat1) / (n - 1) as f64;
            let lon_step = (lon2 - lon1) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let i = i as f64;
                    Coordinate::new(lat1 + i * lat_step, lon1 + i * lon_step)
                })
                .collect()
        }
    }
}

/// Tuning for [`bounds_with`].
#[derive(Debug, Clone, Copy)]
pub struct BoundsOptions {
    /// Accepted relative error of each corner's distance to the target radius.
    pub tolerance: f64,
    /// Refinement steps allowed per corner.
    pub max_iterations: usize,
}

impl Default for BoundsOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            max_iterations: 10_000,
        }
    }
}

/// Estimate a box whose corners lie about `radius_km` from the centre.
pub fn bounds(lat: f64, lon: f64, radius_km: f64) -> Result<BoundingBox> {
    bounds_with(lat, lon, radius_km, &BoundsOptions::default())
}

/// [`bounds`] with explicit tolerance and iteration cap.
///
/// Corners are seeded at 0.1% of the raw coordinate values, so a centre on
/// the equator or prime meridian has a degenerate seed along that axis; at
/// (0, 0) the search cannot move at all and ends in [`Error::Convergence`].
pub fn bounds_with(lat: f64, lon: f64, radius_km: f64, opts: &BoundsOptions) -> Result<BoundingBox> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(Error::InvalidArgument(format!("radius must be positive, got {radius_km}")));
    }
    if !lat.is_finite() || !lon.is_finite() {
        return Err(Error::InvalidArgument(format!("centre must be finite, got ({lat}, {lon})")));
    }

    let center = Coordinate::new(lat, lon);
    let northeast = converge_corner(
        center,
        Coordinate::new(lat * 1.001, lon * 1.001),
        radius_km,
        opts,
        Corner::NorthEast,
    )?;
    let southwest = converge_corner(
        center,
        Coordinate::new(lat * 0.999, lon * 0.999),
        radius_km,
        opts,
        Corner::SouthWest,
    )?;

    Ok(BoundingBox { northeast, southwest })
}

fn converge_corner(
    center: Coordinate,
    seed: Coordinate,
    radius_km: f64,
    opts: &BoundsOptions,
    corner: Corner,
) -> Result<Coordinate> {
    let mut c = seed;
    let mut distance = center.distance_km(&c);
    let mut iterations = 0;

    // Negated so a NaN distance keeps iterating instead of passing as converged.
    while !((1.0 - distance / radius_km).abs() <= opts.tolerance) {
        if iterations >= opts.max_iterations {
            return Err(Error::Convergence {
                corner,
                iterations,
                distance_km: distance,
                radius_km,
            });
        }
        if distance > radius_km {
            c.lat -= (c.lat - center.lat) / 2.0;
            c.lon -= (c.lon - center.lon) / 2.0;
        } else {
            c.lat += (c.lat - center.lat) / 10.0;
            c.lon += (c.lon - center.lon) / 10.0;
        }
        distance = center.distance_km(&c);
        iterations += 1;
    }

    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_haversine_same_point_is_zero() {
        assert_abs_diff_eq!(haversine(59.3293, 18.0686, 59.3293, 18.0686), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(haversine(-33.8688, 151.2093, -33.8688, 151.2093), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_haversine_symmetric() {
        let there = haversine(21.4225, 39.8262, 51.5074, -0.1278);
        let back = haversine(51.5074, -0.1278, 21.4225, 39.8262);
        assert_relative_eq!(there, back, epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_at_equator() {
        assert_abs_diff_eq!(haversine(0.0, 0.0, 0.0, 1.0), 111.19, epsilon = 0.01);
        assert_abs_diff_eq!(haversine(0.0, 0.0, 1.0, 0.0), 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_haversine_antipodal() {
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert_relative_eq!(d, PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_bearing_cardinal() {
        assert_abs_diff_eq!(bearing(0.0, 0.0, 0.0, 1.0), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(0.0, 0.0, 1.0, 0.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(0.0, 0.0, 0.0, -1.0), 270.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(1.0, 0.0, 0.0, 0.0), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_same_point() {
        assert_eq!(bearing(40.0, -105.0, 40.0, -105.0), 0.0);
    }

    #[test]
    fn test_bearing_crosses_antimeridian() {
        // 179E -> 179W is 2 degrees east, not 358 degrees west.
        assert_abs_diff_eq!(bearing(0.0, 179.0, 0.0, -179.0), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(0.0, -179.0, 0.0, 179.0), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_in_range() {
        for &(a, b, c, d) in &[(10.0, 10.0, -20.0, -30.0), (-45.0, 100.0, 60.0, -120.0), (5.0, 5.0, 5.1, 4.9)] {
            let h = bearing(a, b, c, d);
            assert!((0.0..360.0).contains(&h), "bearing {h} out of range");
        }
    }

    #[test]
    fn test_points_along_line_small_counts() {
        assert!(points_along_line(0, 1.0, 2.0, 3.0, 4.0).is_empty());
        assert_eq!(points_along_line(1, 0.0, 0.0, 2.0, 2.0), vec![Coordinate::new(1.0, 1.0)]);
        assert_eq!(
            points_along_line(2, 1.0, 2.0, 3.0, 4.0),
            vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]
        );
    }

    #[test]
    fn test_points_along_line_five() {
        let pts = points_along_line(5, 0.0, 0.0, 4.0, 0.0);
        let lats: Vec<f64> = pts.iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(pts.iter().all(|p| p.lon == 0.0));
    }

    #[test]
    fn test_points_along_line_keeps_endpoints() {
        let pts = points_along_line(7, 59.3293, 18.0686, 59.9139, 10.7522);
        assert_eq!(pts.len(), 7);
        assert_eq!(pts[0], Coordinate::new(59.3293, 18.0686));
        assert_relative_eq!(pts[6].lat, 59.9139, epsilon = 1e-12);
        assert_relative_eq!(pts[6].lon, 10.7522, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds_boulder_one_km() {
        let b = bounds(40.0, -105.0, 1.0).unwrap();
        let ne = haversine(40.0, -105.0, b.northeast.lat, b.northeast.lon);
        let sw = haversine(40.0, -105.0, b.southwest.lat, b.southwest.lon);
        assert!((1.0 - ne).abs() <= 0.1, "northeast at {ne} km");
        assert!((1.0 - sw).abs() <= 0.1, "southwest at {sw} km");
        assert!(b.contains(&Coordinate::new(40.0, -105.0)));
    }

    #[test]
    fn test_bounds_larger_radius() {
        let b = bounds(59.3293, 18.0686, 5.0).unwrap();
        let center = Coordinate::new(59.3293, 18.0686);
        assert!((1.0 - center.distance_km(&b.northeast) / 5.0).abs() <= 0.1);
        assert!((1.0 - center.distance_km(&b.southwest) / 5.0).abs() <= 0.1);
    }

    #[test]
    fn test_bounds_ranges_are_ordered() {
        let b = bounds(40.0, -105.0, 1.0).unwrap();
        let (lat_lo, lat_hi) = b.lat_range();
        let (lon_lo, lon_hi) = b.lon_range();
        assert!(lat_lo < 40.0 && 40.0 < lat_hi);
        assert!(lon_lo < -105.0 && -105.0 < lon_hi);
    }

    #[test]
    fn test_bounds_origin_does_not_hang() {
        let opts = BoundsOptions { tolerance: 0.1, max_iterations: 50 };
        match bounds_with(0.0, 0.0, 1.0, &opts) {
            Err(Error::Convergence { corner, iterations, .. }) => {
                assert_eq!(corner, Corner::NorthEast);
                assert_eq!(iterations, 50);
            }
            other => panic!("expected convergence failure, got {other:?}"),
        }
    }

    #[test]
    fn test_bounds_rejects_bad_radius() {
        assert!(matches!(bounds(40.0, -105.0, 0.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(bounds(40.0, -105.0, f64::NAN), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_bounds_rejects_non_finite_center() {
        assert!(matches!(bounds(f64::NAN, -105.0, 1.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(bounds(40.0, f64::NAN, 1.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(bounds(f64::INFINITY, -105.0, 1.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(bounds(40.0, f64::NEG_INFINITY, 1.0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_converge_corner_nan_distance_is_not_converged() {
        let opts = BoundsOptions { tolerance: 0.1, max_iterations: 5 };
        let center = Coordinate::new(40.0, -105.0);
        let result = converge_corner(center, Coordinate::new(f64::NAN, -105.1), 1.0, &opts, Corner::SouthWest);
        assert!(matches!(
            result,
            Err(Error::Convergence { corner: Corner::SouthWest, iterations: 5, .. })
        ));
    }

    #[test]
    fn test_coordinate_checked() {
        assert!(Coordinate::checked(21.4225, 39.8262).is_ok());
        assert!(Coordinate::checked(91.0, 0.0).is_err());
        assert!(Coordinate::checked(0.0, -180.5).is_err());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(40.0, -105.0).to_string(), "40.0000°N, 105.0000°W");
        assert_eq!(Coordinate::new(-33.8688, 151.2093).to_string(), "33.8688°S, 151.2093°E");
    }
}
