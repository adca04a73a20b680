use serde::{Deserialize, Serialize};

use crate::estimators::EnvironmentalConditions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupWindow {
    Morning,
    Evening,
}

/// How weather shapes a cleanup crew's plan for the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupConditions {
    pub recommended_time: CleanupWindow,
    pub safety_precautions: Vec<String>,
    pub equipment: Vec<String>,
}

impl CleanupConditions {
    pub fn from_conditions(conditions: &EnvironmentalConditions) -> Self {
        let recommended_time = if conditions.temperature_c < 30.0 {
            CleanupWindow::Morning
        } else {
            CleanupWindow::Evening
        };

        Self {
            recommended_time,
            safety_precautions: safety_precautions(conditions),
            equipment: equipment(conditions),
        }
    }
}

fn safety_precautions(conditions: &EnvironmentalConditions) -> Vec<String> {
    let mut precautions = Vec::new();

    if conditions.temperature_c > 35.0 {
        precautions.extend([
            "Heat stroke precautions required",
            "Frequent hydration breaks",
            "Avoid midday operations",
        ]);
    }
    if conditions.uv_index > 8.0 {
        precautions.push("UV protection essential");
    }
    if conditions.wind_speed_kmh > 20.0 {
        precautions.push("Secure loose materials to prevent dispersion");
    }
    if conditions.rainfall_mm > 10.0 {
        precautions.extend(["Waterproof equipment required", "Slip hazard awareness"]);
    }

    if precautions.is_empty() {
        precautions.push("Standard safety protocols apply");
    }
    precautions.into_iter().map(String::from).collect()
}

fn equipment(conditions: &EnvironmentalConditions) -> Vec<String> {
    let mut equipment = vec!["Standard cleanup kit", "Safety gloves", "First aid supplies"];

    if conditions.temperature_c > 30.0 {
        equipment.extend(["Cooling vests", "Extra water supplies", "Shade tents"]);
    }
    if conditions.rainfall_mm > 5.0 {
        equipment.extend(["Waterproof gear", "Non-slip footwear"]);
    }
    if conditions.wind_speed_kmh > 15.0 {
        equipment.extend(["Weighted collection bags", "Wind barriers"]);
    }

    equipment.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> EnvironmentalConditions {
        EnvironmentalConditions {
            temperature_c: 22.0,
            rainfall_mm: 0.0,
            wind_speed_kmh: 5.0,
            uv_index: 4.0,
            ..EnvironmentalConditions::default()
        }
    }

    #[test]
    fn test_calm_day_uses_standard_kit() {
        let plan = CleanupConditions::from_conditions(&calm());
        assert_eq!(plan.recommended_time, CleanupWindow::Morning);
        assert_eq!(plan.safety_precautions, vec!["Standard safety protocols apply"]);
        assert_eq!(plan.equipment.len(), 3);
    }

    #[test]
    fn test_hot_stormy_day() {
        let conditions = EnvironmentalConditions {
            temperature_c: 38.0,
            rainfall_mm: 25.0,
            wind_speed_kmh: 22.0,
            uv_index: 10.0,
            ..calm()
        };
        let plan = CleanupConditions::from_conditions(&conditions);

        assert_eq!(plan.recommended_time, CleanupWindow::Evening);
        // heat (3), uv, wind, rain (2)
        assert_eq!(plan.safety_precautions.len(), 7);
        assert!(plan.safety_precautions.contains(&"UV protection essential".to_string()));
        // base (3), heat (3), rain (2), wind (2)
        assert_eq!(plan.equipment.len(), 10);
        assert!(plan.equipment.contains(&"Wind barriers".to_string()));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let conditions = EnvironmentalConditions {
            temperature_c: 30.0,
            rainfall_mm: 5.0,
            wind_speed_kmh: 15.0,
            ..calm()
        };
        let plan = CleanupConditions::from_conditions(&conditions);
        assert_eq!(plan.recommended_time, CleanupWindow::Evening);
        assert_eq!(plan.equipment.len(), 3);
    }
}
