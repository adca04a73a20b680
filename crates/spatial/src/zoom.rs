use serde::{Deserialize, Serialize};

/// Map zoom levels grouped into the detail bands shared by the heatmap grid and hotspot density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomBand {
    Street,        // zoom >= 15
    Neighbourhood, // zoom >= 12
    City,          // zoom >= 10
    Region,        // zoom < 10
}

impl ZoomBand {
    pub fn from_zoom(zoom_level: u8) -> Self {
        match zoom_level {
            15.. => ZoomBand::Street,
            12..=14 => ZoomBand::Neighbourhood,
            10..=11 => ZoomBand::City,
            _ => ZoomBand::Region,
        }
    }

    /// Grid step in degrees
    pub fn grid_resolution(&self) -> f64 {
        match self {
            ZoomBand::Street => 0.001,
            ZoomBand::Neighbourhood => 0.005,
            ZoomBand::City => 0.01,
            ZoomBand::Region => 0.02,
        }
    }

    pub fn density_multiplier(&self) -> f64 {
        match self {
            ZoomBand::Street => 2.0,
            ZoomBand::Neighbourhood => 1.5,
            ZoomBand::City => 1.0,
            ZoomBand::Region => 0.5,
        }
    }
}
