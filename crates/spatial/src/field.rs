use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geo::{GeoBounds, GeoPoint};
use crate::zoom::ZoomBand;
use crate::SpatialError;

/// One step of a center's falloff: points closer than `max_distance_deg` get `multiplier`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfluenceBand {
    pub max_distance_deg: f64,
    pub multiplier: f64,
}

/// A known pollution source (city center, industrial zone) that boosts nearby intensity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceCenter {
    pub location: GeoPoint,
    pub bands: Vec<InfluenceBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub centers: Vec<InfluenceCenter>,
    /// Grid points at or below this intensity are not emitted
    pub visibility_threshold: f64,
    /// Upper bound on cells scanned by a single grid walk
    pub max_grid_points: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            centers: vec![InfluenceCenter {
                location: GeoPoint::new(28.6139, 77.2090),
                bands: vec![
                    InfluenceBand {
                        max_distance_deg: 0.1,
                        multiplier: 1.5,
                    },
                    InfluenceBand {
                        max_distance_deg: 0.2,
                        multiplier: 1.2,
                    },
                ],
            }],
            visibility_threshold: 0.1,
            max_grid_points: 250_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

/// Deterministic pollution-intensity surface over geographic coordinates
#[derive(Debug, Clone)]
pub struct SpatialIntensityField {
    config: FieldConfig,
}

impl SpatialIntensityField {
    pub fn new(mut config: FieldConfig) -> Self {
        // Nearest band must be tried first
        for center in &mut config.centers {
            center
                .bands
                .sort_by(|a, b| a.max_distance_deg.total_cmp(&b.max_distance_deg));
        }
        Self { config }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Intensity in [0, 1] at a coordinate
    pub fn intensity(&self, lat: f64, lng: f64) -> f64 {
        let c1 = (lat * 100.0).sin() * (lng * 100.0).cos();
        let c2 = (lat * 150.0 + 1.0).sin() * (lng * 120.0 + 0.5).cos();
        let c3 = (lat * 80.0 + 2.0).sin() * (lng * 90.0 + 1.5).cos();

        let base = (c1 + c2 + c3) / 3.0;
        let mut intensity = (base + 1.0) / 2.0;

        let point = GeoPoint::new(lat, lng);
        for center in &self.config.centers {
            let distance = point.degree_distance(&center.location);
            if let Some(band) = center
                .bands
                .iter()
                .find(|band| distance < band.max_distance_deg)
            {
                intensity *= band.multiplier;
            }
        }

        intensity.clamp(0.0, 1.0)
    }

    pub fn intensity_at(&self, point: &GeoPoint) -> f64 {
        self.intensity(point.lat, point.lng)
    }

    /// Lazily walk the box row by row at `resolution` degrees, skipping faint points.
    ///
    /// Coordinates are computed as `min + i * step`, so long walks do not drift.
    pub fn grid(
        &self,
        bounds: &GeoBounds,
        resolution: f64,
    ) -> Result<impl Iterator<Item = GridPoint> + '_, SpatialError> {
        bounds.validate()?;
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SpatialError::InvalidResolution(resolution));
        }

        let bounds = *bounds;
        let step = self.effective_resolution(&bounds, resolution);
        let rows = step_count(bounds.lat_span(), step);
        let cols = step_count(bounds.lng_span(), step);
        let threshold = self.config.visibility_threshold;

        debug!(rows, cols, step, "Walking intensity grid");

        let points = (0..rows)
            .flat_map(move |i| {
                let lat = bounds.lat_min + i as f64 * step;
                (0..cols).map(move |j| (lat, bounds.lng_min + j as f64 * step))
            })
            .filter(move |&(lat, lng)| lat < bounds.lat_max && lng < bounds.lng_max)
            .map(move |(lat, lng)| GridPoint {
                lat,
                lng,
                intensity: self.intensity(lat, lng),
            })
            .filter(move |p| p.intensity > threshold);

        Ok(points)
    }

    pub fn grid_for_zoom(
        &self,
        bounds: &GeoBounds,
        zoom_level: u8,
    ) -> Result<impl Iterator<Item = GridPoint> + '_, SpatialError> {
        self.grid(bounds, ZoomBand::from_zoom(zoom_level).grid_resolution())
    }

    /// Coarsen the requested step until the walk fits in `max_grid_points` cells
    fn effective_resolution(&self, bounds: &GeoBounds, requested: f64) -> f64 {
        let max_cells = self.config.max_grid_points.max(1);
        // Counted in f64 so absurdly fine steps cannot overflow usize
        let cells = |step: f64| cell_span(bounds.lat_span(), step) * cell_span(bounds.lng_span(), step);
        let limit = max_cells as f64;

        if cells(requested) <= limit {
            return requested;
        }

        let mut step = requested.max((bounds.area() / limit).sqrt());
        while cells(step) > limit {
            step *= 1.05;
        }

        warn!(
            requested,
            effective = step,
            max_cells,
            "Grid request too dense, coarsening resolution"
        );
        step
    }
}

fn cell_span(span: f64, step: f64) -> f64 {
    (span / step).ceil().max(1.0)
}

fn step_count(span: f64, step: f64) -> usize {
    cell_span(span, step) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> SpatialIntensityField {
        SpatialIntensityField::new(FieldConfig::default())
    }

    #[test]
    fn test_intensity_is_deterministic() {
        let field = field();
        let a = field.intensity(20.05, 85.05);
        let b = field.intensity(20.05, 85.05);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_intensity_in_unit_range() {
        let field = field();
        for i in 0..50 {
            for j in 0..50 {
                let v = field.intensity(28.5 + i as f64 * 0.01, 77.0 + j as f64 * 0.01);
                assert!((0.0..=1.0).contains(&v), "intensity {} out of range", v);
            }
        }
    }

    #[test]
    fn test_center_boost_applies() {
        let boosted = field();
        let plain = SpatialIntensityField::new(FieldConfig {
            centers: Vec::new(),
            ..FieldConfig::default()
        });

        let (lat, lng) = (28.62, 77.21);
        let base = plain.intensity(lat, lng);
        let expected = (base * 1.5).min(1.0);
        assert!((boosted.intensity(lat, lng) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_outer_band_applies_between_thresholds() {
        let boosted = field();
        let plain = SpatialIntensityField::new(FieldConfig {
            centers: Vec::new(),
            ..FieldConfig::default()
        });

        // 0.15 degrees north of the default center
        let (lat, lng) = (28.7639, 77.2090);
        let expected = (plain.intensity(lat, lng) * 1.2).min(1.0);
        assert!((boosted.intensity(lat, lng) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_bands_are_normalised() {
        let mut config = FieldConfig::default();
        config.centers[0].bands.reverse();
        let reversed = SpatialIntensityField::new(config);
        assert_eq!(
            reversed.intensity(28.62, 77.21).to_bits(),
            field().intensity(28.62, 77.21).to_bits()
        );
    }

    #[test]
    fn test_grid_points_stay_inside_bounds() {
        let field = field();
        let bounds = GeoBounds::new(20.0, 20.1, 85.0, 85.1).unwrap();
        let points: Vec<_> = field.grid(&bounds, 0.005).unwrap().collect();

        assert!(!points.is_empty());
        for p in &points {
            assert!(p.lat >= bounds.lat_min && p.lat < bounds.lat_max);
            assert!(p.lng >= bounds.lng_min && p.lng < bounds.lng_max);
            assert!(p.intensity > 0.1);
        }
    }

    #[test]
    fn test_grid_rejects_invalid_bounds() {
        let field = field();
        let bounds = GeoBounds {
            lat_min: 20.1,
            lat_max: 20.0,
            lng_min: 85.0,
            lng_max: 85.1,
        };
        assert!(matches!(
            field.grid(&bounds, 0.01).err(),
            Some(SpatialError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_grid_rejects_zero_resolution() {
        let field = field();
        let bounds = GeoBounds::new(20.0, 20.1, 85.0, 85.1).unwrap();
        assert!(matches!(
            field.grid(&bounds, 0.0).err(),
            Some(SpatialError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_grid_is_capped_for_huge_boxes() {
        let field = SpatialIntensityField::new(FieldConfig {
            max_grid_points: 1_000,
            ..FieldConfig::default()
        });
        let bounds = GeoBounds::new(-60.0, 60.0, -170.0, 170.0).unwrap();
        let count = field.grid(&bounds, 0.001).unwrap().count();
        assert!(count <= 1_000, "emitted {} points", count);
    }

    #[test]
    fn test_grid_survives_vanishing_resolution() {
        let field = field();
        let bounds = GeoBounds::new(20.0, 20.1, 85.0, 85.1).unwrap();
        let count = field.grid(&bounds, 1e-12).unwrap().count();
        assert!(count <= FieldConfig::default().max_grid_points);
    }

    #[test]
    fn test_grid_for_zoom_uses_band_resolution() {
        let field = SpatialIntensityField::new(FieldConfig {
            visibility_threshold: -1.0,
            ..FieldConfig::default()
        });
        let bounds = GeoBounds::new(20.0, 20.1, 85.0, 85.1).unwrap();
        // 0.02 degree steps over a 0.1 degree box: at most 6 x 6 cells
        let count = field.grid_for_zoom(&bounds, 5).unwrap().count();
        assert!((25..=36).contains(&count), "got {}", count);
    }
}
