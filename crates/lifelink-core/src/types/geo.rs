//! Geographic coordinate type and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the Earth's surface in decimal degrees.
///
/// Field order follows the GeoJSON convention: longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees (-180..180).
    pub longitude: f64,
    /// Latitude in degrees (-90..90).
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a point from a longitude/latitude pair.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Whether both coordinates are finite and within valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Great-circle distance to another point in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }

    /// Bounding box with the given half-extent in kilometers.
    ///
    /// Used as a coarse SQL prefilter; callers apply the exact haversine
    /// distance afterwards. Near the poles the longitude span degenerates
    /// to the full circle.
    pub fn bounding_box(&self, radius_km: f64) -> BoundingBox {
        let lat_delta = radius_km / 111.045;
        let lon_scale = self.latitude.to_radians().cos().abs();
        let lon_delta = if lon_scale < 1e-6 {
            180.0
        } else {
            radius_km / (111.045 * lon_scale)
        };

        BoundingBox {
            min_latitude: (self.latitude - lat_delta).max(-90.0),
            max_latitude: (self.latitude + lat_delta).min(90.0),
            min_longitude: (self.longitude - lon_delta).max(-180.0),
            max_longitude: (self.longitude + lon_delta).min(180.0),
        }
    }
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge in degrees.
    pub min_latitude: f64,
    /// Northern edge in degrees.
    pub max_latitude: f64,
    /// Western edge in degrees.
    pub min_longitude: f64,
    /// Eastern edge in degrees.
    pub max_longitude: f64,
}

/// Haversine great-circle distance between two points, in kilometers.
///
/// Pure and deterministic. Non-finite input yields NaN rather than an
/// error; callers validate coordinate shape beforehand.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(77.5946, 12.9716);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(77.5946, 12.9716);
        let b = GeoPoint::new(72.8777, 19.0760);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = haversine_km(a, b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        let a = GeoPoint::new(f64::NAN, 0.0);
        let b = GeoPoint::new(0.0, 0.0);
        assert!(haversine_km(a, b).is_nan());
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let center = GeoPoint::new(77.5946, 12.9716);
        let bbox = center.bounding_box(25.0);
        // A point 20 km due north stays inside the box.
        let north = GeoPoint::new(77.5946, 12.9716 + 20.0 / 111.045);
        assert!(north.latitude <= bbox.max_latitude);
        assert!(north.latitude >= bbox.min_latitude);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(GeoPoint::new(77.0, 12.0).is_valid());
        assert!(!GeoPoint::new(181.0, 12.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 12.0).is_valid());
    }
}
