use serde::{Deserialize, Serialize};

use crate::SpatialError;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Planar distance in degrees, the metric the intensity field uses for its influence bands
    pub fn degree_distance(&self, other: &GeoPoint) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)).sqrt()
    }
}

/// Axis-aligned geographic bounding box.
///
/// Containment is half-open: `lat_min <= lat < lat_max` and `lng_min <= lng < lng_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl GeoBounds {
    pub fn new(lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> Result<Self, SpatialError> {
        let bounds = Self {
            lat_min,
            lat_max,
            lng_min,
            lng_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Bounds arriving through serde skip the constructor, so every consumer re-checks them here.
    pub fn validate(&self) -> Result<(), SpatialError> {
        let all_finite = [self.lat_min, self.lat_max, self.lng_min, self.lng_max]
            .iter()
            .all(|v| v.is_finite());

        if !all_finite {
            return Err(SpatialError::InvalidBounds(format!(
                "bounds must be finite numbers, got {:?}",
                self
            )));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err(SpatialError::InvalidBounds(format!(
                "latitudes must lie within [-90, 90], got {} to {}",
                self.lat_min, self.lat_max
            )));
        }
        if self.lng_min < -180.0 || self.lng_max > 180.0 {
            return Err(SpatialError::InvalidBounds(format!(
                "longitudes must lie within [-180, 180], got {} to {}",
                self.lng_min, self.lng_max
            )));
        }
        if self.lat_min >= self.lat_max {
            return Err(SpatialError::InvalidBounds(format!(
                "lat_min ({}) must be below lat_max ({})",
                self.lat_min, self.lat_max
            )));
        }
        if self.lng_min >= self.lng_max {
            return Err(SpatialError::InvalidBounds(format!(
                "lng_min ({}) must be below lng_max ({})",
                self.lng_min, self.lng_max
            )));
        }
        Ok(())
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lng_span(&self) -> f64 {
        self.lng_max - self.lng_min
    }

    /// Area in square degrees
    pub fn area(&self) -> f64 {
        self.lat_span() * self.lng_span()
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat < self.lat_max
            && point.lng >= self.lng_min
            && point.lng < self.lng_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_latitude() {
        let err = GeoBounds::new(20.1, 20.0, 85.0, 85.1).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidBounds(_)));
    }

    #[test]
    fn test_rejects_degenerate_longitude() {
        assert!(GeoBounds::new(20.0, 20.1, 85.0, 85.0).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(GeoBounds::new(f64::NAN, 20.1, 85.0, 85.1).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(matches!(
            GeoBounds::new(-1e308, 1e308, 0.0, 1.0),
            Err(SpatialError::InvalidBounds(_))
        ));
        assert!(GeoBounds::new(0.0, 1.0, 179.5, 180.5).is_err());
        assert!(GeoBounds::new(-90.0, 90.0, -180.0, 180.0).is_ok());
    }

    #[test]
    fn test_half_open_containment() {
        let bounds = GeoBounds::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(bounds.contains(&GeoPoint::new(0.0, 0.0)));
        assert!(!bounds.contains(&GeoPoint::new(1.0, 0.5)));
        assert!(!bounds.contains(&GeoPoint::new(0.5, 1.0)));
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }
}
