use serde::{Deserialize, Serialize};

use crate::field::{GridPoint, SpatialIntensityField};
use crate::geo::GeoBounds;
use crate::{round_to, SpatialError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatSource {
    HighTrashDensity,
    WaterContamination,
    ModerateContamination,
    LowLevelPollution,
}

/// A single renderable heatmap overlay point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
    /// Visual radius for the map layer, in pixels
    pub radius: u32,
    pub data_sources: Vec<HeatSource>,
}

impl From<GridPoint> for HeatmapPoint {
    fn from(point: GridPoint) -> Self {
        let data_sources = if point.intensity > 0.7 {
            vec![HeatSource::HighTrashDensity, HeatSource::WaterContamination]
        } else if point.intensity > 0.4 {
            vec![HeatSource::ModerateContamination]
        } else {
            vec![HeatSource::LowLevelPollution]
        };

        Self {
            lat: point.lat,
            lng: point.lng,
            intensity: round_to(point.intensity, 3),
            radius: (point.intensity * 200.0) as u32 + 50,
            data_sources,
        }
    }
}

/// Render the visible grid of `bounds` at the resolution for `zoom_level`
pub fn heatmap(
    field: &SpatialIntensityField,
    bounds: &GeoBounds,
    zoom_level: u8,
) -> Result<Vec<HeatmapPoint>, SpatialError> {
    Ok(field
        .grid_for_zoom(bounds, zoom_level)?
        .map(HeatmapPoint::from)
        .collect())
}
