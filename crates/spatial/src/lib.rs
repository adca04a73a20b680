pub mod field;
pub mod geo;
pub mod heatmap;
pub mod zoom;

pub use field::{FieldConfig, GridPoint, InfluenceBand, InfluenceCenter, SpatialIntensityField};
pub use geo::{GeoBounds, GeoPoint};
pub use heatmap::{heatmap, HeatSource, HeatmapPoint};
pub use zoom::ZoomBand;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("invalid grid resolution: {0} (must be a positive number of degrees)")]
    InvalidResolution(f64),
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
