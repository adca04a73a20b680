use serde::{Deserialize, Serialize};

use crate::category::Material;
use crate::round_to;
use crate::schema::DetectionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureLevel {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonImpact {
    pub co2_equivalent_kg: f64,
    pub equivalent_car_km: f64,
    pub equivalent_tree_months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterImpact {
    pub water_at_risk_liters: f64,
    pub groundwater_threat: bool,
    pub aquatic_ecosystem_risk: ExposureLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilImpact {
    pub affected_area_m2: f64,
    pub contamination_depth_cm: f64,
    pub remediation_time_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiodiversityImpact {
    pub wildlife_threat_score: f64,
    pub species_at_risk: u32,
    pub habitat_degradation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroplasticImpact {
    pub potential_particles: u64,
    pub food_chain_risk: ExposureLevel,
}

/// Downstream environmental cost of leaving the detected items in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub carbon: CarbonImpact,
    pub water: WaterImpact,
    pub soil: SoilImpact,
    pub biodiversity: BiodiversityImpact,
    pub microplastics: MicroplasticImpact,
}

const CO2_KG_PER_KG_WASTE: f64 = 2.3;
const CO2_KG_PER_CAR_KM: f64 = 0.2;
const CO2_KG_PER_TREE_MONTH: f64 = 0.5;
const WATER_LITERS_PER_KG: f64 = 15.0;
const SOIL_M2_PER_ITEM: f64 = 5.0;
const PARTICLES_PER_PLASTIC_ITEM: u64 = 1000;

/// `None` when nothing was detected
pub fn environmental_impact(summary: &DetectionSummary) -> Option<EnvironmentalImpact> {
    if summary.detections.is_empty() {
        return None;
    }

    let weight = summary.total_weight_kg;
    let items = summary.total_items as f64;
    let plastic_items = summary.count_material(Material::Plastic);

    let co2 = weight * CO2_KG_PER_KG_WASTE;
    let wildlife_threat = (items / 10.0).min(10.0);

    Some(EnvironmentalImpact {
        carbon: CarbonImpact {
            co2_equivalent_kg: round_to(co2, 2),
            equivalent_car_km: round_to(co2 / CO2_KG_PER_CAR_KM, 1),
            equivalent_tree_months: round_to(co2 / CO2_KG_PER_TREE_MONTH, 1),
        },
        water: WaterImpact {
            water_at_risk_liters: round_to(weight * WATER_LITERS_PER_KG, 2),
            groundwater_threat: weight > 10.0,
            aquatic_ecosystem_risk: if weight > 50.0 {
                ExposureLevel::High
            } else {
                ExposureLevel::Medium
            },
        },
        soil: SoilImpact {
            affected_area_m2: round_to(items * SOIL_M2_PER_ITEM, 2),
            contamination_depth_cm: (weight / 2.0).min(30.0),
            remediation_time_months: ((weight / 20.0) as u32).max(1),
        },
        biodiversity: BiodiversityImpact {
            wildlife_threat_score: round_to(wildlife_threat, 1),
            species_at_risk: ((wildlife_threat / 2.0) as u32).max(1),
            habitat_degradation: wildlife_threat > 5.0,
        },
        microplastics: MicroplasticImpact {
            potential_particles: plastic_items as u64 * PARTICLES_PER_PLASTIC_ITEM,
            food_chain_risk: if plastic_items > 10 {
                ExposureLevel::High
            } else {
                ExposureLevel::Medium
            },
        },
    })
}
