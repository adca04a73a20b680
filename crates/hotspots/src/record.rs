use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use spatial::GeoPoint;

use crate::cost::CleanupEstimate;

/// Labels a hotspot's contamination can be drawn from
pub const CONTAMINATION_TYPES: [&str; 9] = [
    "plastic_bottles",
    "food_waste",
    "paper_debris",
    "cigarette_butts",
    "metal_cans",
    "glass_fragments",
    "electronic_waste",
    "construction_debris",
    "medical_waste",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntensityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl IntensityLevel {
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity >= 0.8 {
            IntensityLevel::Critical
        } else if intensity >= 0.6 {
            IntensityLevel::High
        } else if intensity >= 0.4 {
            IntensityLevel::Medium
        } else {
            IntensityLevel::Low
        }
    }
}

/// Priority in [1, 10] from an intensity in [0, 1]
pub fn priority_for(intensity: f64) -> u8 {
    (1.0 + (intensity * 9.0).round()).clamp(1.0, 10.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentalFlags {
    pub water_risk: bool,
    pub air_quality_impact: bool,
}

impl EnvironmentalFlags {
    pub fn from_intensity(intensity: f64) -> Self {
        Self {
            water_risk: intensity > 0.7,
            air_quality_impact: intensity > 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotRecord {
    pub id: String,
    pub location: GeoPoint,
    pub intensity: f64,
    pub intensity_level: IntensityLevel,
    pub priority: u8,
    pub contamination_types: BTreeSet<String>,
    pub estimated_items: u32,
    pub estimated_weight_kg: f64,
    pub cleanup_cost_usd: f64,
    pub cleanup: CleanupEstimate,
    pub environmental_flags: EnvironmentalFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_range() {
        assert_eq!(priority_for(0.0), 1);
        assert_eq!(priority_for(0.5), 6);
        assert_eq!(priority_for(1.0), 10);
        assert_eq!(priority_for(2.0), 10);
    }

    #[test]
    fn test_intensity_levels() {
        assert_eq!(IntensityLevel::from_intensity(0.85), IntensityLevel::Critical);
        assert_eq!(IntensityLevel::from_intensity(0.8), IntensityLevel::Critical);
        assert_eq!(IntensityLevel::from_intensity(0.6), IntensityLevel::High);
        assert_eq!(IntensityLevel::from_intensity(0.45), IntensityLevel::Medium);
        assert_eq!(IntensityLevel::from_intensity(0.1), IntensityLevel::Low);
        assert_eq!(
            serde_json::to_string(&IntensityLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }

    #[test]
    fn test_environmental_flags() {
        let flags = EnvironmentalFlags::from_intensity(0.65);
        assert!(flags.air_quality_impact);
        assert!(!flags.water_risk);
        assert!(EnvironmentalFlags::from_intensity(0.75).water_risk);
    }
}
