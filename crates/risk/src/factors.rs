use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use detection::{DetectionCategory, DetectionSummary, Material};
use water::{ContaminantKind, WaterQualityResult};

/// Contamination conditions that drive disease risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    StagnantWater,
    OrganicWaste,
    PlasticWaste,
    IndustrialWaste,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 4] = [
        RiskFactor::StagnantWater,
        RiskFactor::OrganicWaste,
        RiskFactor::PlasticWaste,
        RiskFactor::IndustrialWaste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::StagnantWater => "stagnant_water",
            RiskFactor::OrganicWaste => "organic_waste",
            RiskFactor::PlasticWaste => "plastic_waste",
            RiskFactor::IndustrialWaste => "industrial_waste",
        }
    }

    pub fn diseases(&self) -> &'static [&'static str] {
        match self {
            RiskFactor::StagnantWater => &["dengue", "malaria", "zika", "chikungunya"],
            RiskFactor::OrganicWaste => &["cholera", "typhoid", "hepatitis_a", "gastroenteritis"],
            RiskFactor::PlasticWaste => &["respiratory_issues", "skin_infections"],
            RiskFactor::IndustrialWaste => &["cancer", "respiratory_disease", "neurological_disorders"],
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            RiskFactor::StagnantWater => 2.5,
            RiskFactor::OrganicWaste => 2.0,
            RiskFactor::PlasticWaste => 1.3,
            RiskFactor::IndustrialWaste => 3.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::StagnantWater => "Breeding ground for disease vectors",
            RiskFactor::OrganicWaste => "Bacterial contamination risk",
            RiskFactor::PlasticWaste => "Toxic chemical leaching",
            RiskFactor::IndustrialWaste => "Heavy metal and chemical contamination",
        }
    }
}

/// A factor found active for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFactor {
    pub factor: RiskFactor,
    pub multiplier: f64,
    pub description: String,
}

impl From<RiskFactor> for ActiveFactor {
    fn from(factor: RiskFactor) -> Self {
        Self {
            factor,
            multiplier: factor.multiplier(),
            description: factor.description().to_string(),
        }
    }
}

/// Detection-risk weight per material
pub fn material_multiplier(material: Material) -> f64 {
    match material {
        Material::Plastic => 1.0,
        Material::Metal => 1.5,
        Material::Glass => 1.2,
        Material::Organic => 0.8,
        _ => 1.0,
    }
}

/// Factors signalled by the inputs. Unsuccessful detection runs contribute nothing.
pub fn active_factors(
    detection: Option<&DetectionSummary>,
    water: Option<&WaterQualityResult>,
) -> BTreeSet<RiskFactor> {
    let mut factors = BTreeSet::new();

    if let Some(summary) = detection.filter(|s| s.success) {
        if summary.count_material(Material::Organic) > 0 {
            factors.insert(RiskFactor::OrganicWaste);
        }
        if summary.count_material(Material::Plastic) > 0 {
            factors.insert(RiskFactor::PlasticWaste);
        }
        if summary.contains_category(DetectionCategory::Electronics) {
            factors.insert(RiskFactor::IndustrialWaste);
        }
    }

    if let Some(result) = water {
        if result.has_contaminant(ContaminantKind::AlgaeBloom) || result.has_contaminant(ContaminantKind::Sediment) {
            factors.insert(RiskFactor::StagnantWater);
        }
        if result.has_contaminant(ContaminantKind::OilSpill) {
            factors.insert(RiskFactor::IndustrialWaste);
        }
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use detection::{BoundingBox, Detection, DetectionScorer, ScorerConfig};
    use water::{ContaminationReading, WaterConfig, WaterQualityScorer};

    fn summary(categories: &[DetectionCategory]) -> DetectionSummary {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let detections = categories
            .iter()
            .map(|c| Detection::new(*c, 0.8, bbox, 0.1))
            .collect();
        DetectionScorer::new(ScorerConfig::default()).summarize(detections)
    }

    #[test]
    fn test_material_multipliers() {
        assert_eq!(material_multiplier(Material::Plastic), 1.0);
        assert_eq!(material_multiplier(Material::Metal), 1.5);
        assert_eq!(material_multiplier(Material::Glass), 1.2);
        assert_eq!(material_multiplier(Material::Organic), 0.8);
        assert_eq!(material_multiplier(Material::Paper), 1.0);
    }

    #[test]
    fn test_detection_signals() {
        let s = summary(&[
            DetectionCategory::PlasticBag,
            DetectionCategory::OrganicWaste,
            DetectionCategory::Electronics,
        ]);
        let factors = active_factors(Some(&s), None);
        assert_eq!(
            factors.into_iter().collect::<Vec<_>>(),
            vec![RiskFactor::OrganicWaste, RiskFactor::PlasticWaste, RiskFactor::IndustrialWaste]
        );
    }

    #[test]
    fn test_failed_detection_has_no_signals() {
        let s = DetectionSummary::failed("detector offline");
        assert!(active_factors(Some(&s), None).is_empty());
        assert!(active_factors(None, None).is_empty());
    }

    #[test]
    fn test_water_signals() {
        let scorer = WaterQualityScorer::new(WaterConfig::default());
        let result = scorer.analyze(
            &[
                ContaminationReading::new(ContaminantKind::Sediment, 10.0),
                ContaminationReading::new(ContaminantKind::OilSpill, 5.0),
            ],
            &[],
        );
        let factors = active_factors(None, Some(&result));
        assert!(factors.contains(&RiskFactor::StagnantWater));
        assert!(factors.contains(&RiskFactor::IndustrialWaste));
        assert_eq!(factors.len(), 2);
    }

    #[test]
    fn test_factor_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RiskFactor::StagnantWater).unwrap(),
            "\"stagnant_water\""
        );
    }
}
