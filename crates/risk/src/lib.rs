pub mod assessment;
pub mod cleanup;
pub mod disease;
pub mod estimators;
pub mod factors;

pub use assessment::{ComponentScores, MonetaryImpact, RiskAssessment};
pub use cleanup::{CleanupConditions, CleanupWindow};
pub use disease::{DiseasePredictor, FactorTablePredictor};
pub use estimators::{
    EnvironmentalConditions, EnvironmentalModifiers, FixedEstimator, SensitiveSite, SensitiveSiteKind,
    SiteEstimator, SiteFactors, SurveyEstimator,
};
pub use factors::{active_factors, material_multiplier, ActiveFactor, RiskFactor};
pub use water::RiskTier;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use detection::DetectionSummary;
use spatial::{round_to, GeoPoint};
use water::WaterQualityResult;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("risk computation failed: {0}")]
    Computation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Detection risk used when no successful detection run is available
    pub missing_detection_floor: f64,
    /// Water risk used when no water sample is available
    pub missing_water_floor: f64,
    pub min_water_risk: f64,
    pub max_detection_risk: f64,
    /// Radius of the affected area at a combined score of zero
    pub affected_radius_km: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            missing_detection_floor: 0.1,
            missing_water_floor: 0.05,
            min_water_risk: 0.1,
            max_detection_risk: 10.0,
            affected_radius_km: 0.5,
        }
    }
}

/// Tier for a combined score: below 3 low, below 6 medium, otherwise high
pub fn tier_for(score: f64) -> RiskTier {
    if score < 3.0 {
        RiskTier::Low
    } else if score < 6.0 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

pub fn monetary_impact(detection_risk: f64, water_risk: f64) -> MonetaryImpact {
    let cost = detection_risk * 1000.0 + water_risk * 500.0;
    let impact_level = if cost < 500.0 {
        RiskTier::Low
    } else if cost < 2000.0 {
        RiskTier::Medium
    } else {
        RiskTier::High
    };

    MonetaryImpact {
        estimated_cost_usd: round_to(cost, 2),
        impact_level,
    }
}

/// Fuses detection, water and site factors into one assessment
#[derive(Clone)]
pub struct RiskAggregator {
    config: AggregatorConfig,
    predictor: Arc<dyn DiseasePredictor>,
}

impl RiskAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self::with_predictor(config, Arc::new(FactorTablePredictor))
    }

    pub fn with_predictor(config: AggregatorConfig, predictor: Arc<dyn DiseasePredictor>) -> Self {
        Self { config, predictor }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// `sum(confidence * weight * material multiplier)`, clamped to [0, max]
    pub fn detection_risk(&self, summary: Option<&DetectionSummary>) -> Result<f64, RiskError> {
        let Some(summary) = summary.filter(|s| s.success) else {
            return Ok(self.config.missing_detection_floor);
        };

        let mut risk = 0.0;
        for detection in &summary.detections {
            if !detection.confidence.is_finite()
                || !detection.estimated_weight_kg.is_finite()
                || detection.confidence < 0.0
                || detection.estimated_weight_kg < 0.0
            {
                return Err(RiskError::Computation(format!(
                    "detection {} has confidence {} and weight {}",
                    detection.category, detection.confidence, detection.estimated_weight_kg
                )));
            }
            risk += detection.confidence
                * detection.estimated_weight_kg
                * material_multiplier(detection.category.material());
        }

        Ok(risk.clamp(0.0, self.config.max_detection_risk))
    }

    pub fn water_risk(&self, result: Option<&WaterQualityResult>) -> Result<f64, RiskError> {
        let Some(result) = result else {
            return Ok(self.config.missing_water_floor);
        };

        if !result.index.is_finite() || !(0.0..=100.0).contains(&result.index) {
            return Err(RiskError::Computation(format!(
                "water quality index {} outside [0, 100]",
                result.index
            )));
        }

        Ok(((1.0 - result.index / 100.0) * 10.0).max(self.config.min_water_risk))
    }

    /// Like [`combine`](Self::combine) but surfaces computation errors
    pub fn try_combine(
        &self,
        location: GeoPoint,
        detection: Option<&DetectionSummary>,
        water: Option<&WaterQualityResult>,
        site: &SiteFactors,
    ) -> Result<RiskAssessment, RiskError> {
        for (name, value) in [
            ("latitude", location.lat),
            ("longitude", location.lng),
            ("proximity score", site.proximity),
            ("environmental score", site.environmental),
            ("population density", site.population_density),
        ] {
            if !value.is_finite() {
                return Err(RiskError::Computation(format!("{name} is not finite")));
            }
        }
        for (name, value) in [
            ("proximity score", site.proximity),
            ("environmental score", site.environmental),
            ("population density", site.population_density),
        ] {
            if value < 0.0 {
                return Err(RiskError::Computation(format!("{name} is negative: {value}")));
            }
        }

        let component_scores = ComponentScores {
            detection: self.detection_risk(detection)?,
            water: self.water_risk(water)?,
            proximity: site.proximity,
            environmental: site.environmental,
        };

        // Tier, priority and population all derive from the reported score
        let combined = round_to(component_scores.total(), 3);
        if !combined.is_finite() {
            return Err(RiskError::Computation("combined score is not finite".to_string()));
        }

        let tier = tier_for(combined);
        let factors = active_factors(detection, water);

        let predicted_diseases: BTreeSet<String> = factors
            .iter()
            .flat_map(|f| self.predictor.predict(*f, combined))
            .collect();

        let priority = combined * (1.0 + site.proximity / 5.0);

        let radius = self.config.affected_radius_km * (1.0 + combined / 10.0);
        let population = (site.population_density * PI * radius * radius).round();
        if !population.is_finite() {
            return Err(RiskError::Computation("affected population is not finite".to_string()));
        }

        let impact = monetary_impact(component_scores.detection, component_scores.water);
        let recommendations = recommendations(tier, &factors);

        debug!(
            lat = location.lat,
            lng = location.lng,
            combined,
            tier = tier.as_str(),
            factors = factors.len(),
            "Combined risk assessment"
        );

        Ok(RiskAssessment {
            success: true,
            error: None,
            location,
            component_scores,
            combined_score: combined,
            tier,
            active_factors: factors.into_iter().map(ActiveFactor::from).collect(),
            predicted_diseases,
            priority_score: round_to(priority, 3),
            estimated_population_affected: population as u64,
            impact,
            recommendations,
        })
    }

    /// Never fails: computation errors yield a zero-score assessment marked unsuccessful
    pub fn combine(
        &self,
        location: GeoPoint,
        detection: Option<&DetectionSummary>,
        water: Option<&WaterQualityResult>,
        site: &SiteFactors,
    ) -> RiskAssessment {
        match self.try_combine(location, detection, water, site) {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(lat = location.lat, lng = location.lng, error = %e, "Risk assessment failed");
                RiskAssessment::failed(location, e.to_string())
            }
        }
    }
}

fn recommendations(tier: RiskTier, factors: &BTreeSet<RiskFactor>) -> Vec<String> {
    let mut recommendations: Vec<String> = match tier {
        RiskTier::High => vec![
            "Immediate cleanup required within 24 hours",
            "Notify local health authorities",
            "Restrict public access to the affected area",
        ],
        RiskTier::Medium => vec![
            "Schedule cleanup within one week",
            "Increase monitoring frequency",
        ],
        RiskTier::Low => vec![
            "Include in routine cleanup schedule",
            "Continue periodic monitoring",
        ],
    }
    .into_iter()
    .map(String::from)
    .collect();

    if factors.contains(&RiskFactor::StagnantWater) {
        recommendations.push("Apply vector control measures to prevent mosquito breeding".to_string());
    }

    recommendations
}
