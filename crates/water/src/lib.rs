pub mod advisory;
pub mod schema;

pub use schema::{
    ContaminantKind, ContaminationReading, HealthRisk, HealthRiskSource, ParameterReading, QualityGrade,
    RiskTier, WaterParameter, WaterQualityResult,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use spatial::round_to;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Readings covering this share of the frame or less are treated as noise
    pub detection_threshold_percent: f64,
    pub contamination_penalty: f64,
    pub parameter_penalty: f64,
    pub high_severity: f64,
    pub medium_severity: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            detection_threshold_percent: 0.1,
            contamination_penalty: 50.0,
            parameter_penalty: 10.0,
            high_severity: 0.7,
            medium_severity: 0.5,
        }
    }
}

/// Water Quality Index (0-100) and health-risk classification
#[derive(Debug, Clone)]
pub struct WaterQualityScorer {
    config: WaterConfig,
}

impl WaterQualityScorer {
    pub fn new(config: WaterConfig) -> Self {
        Self { config }
    }

    /// Severity-weighted coverage in [0, 1]
    pub fn contamination_score(&self, readings: &[ContaminationReading]) -> f64 {
        let weighted: f64 = readings
            .iter()
            .map(|r| r.coverage_percent.clamp(0.0, 100.0) * r.severity.clamp(0.0, 1.0))
            .sum();

        round_to((weighted / 100.0).min(1.0), 3)
    }

    /// `100 - score * 50 - out_of_range * 10`, clamped to [0, 100]
    pub fn quality_index(&self, contamination_score: f64, out_of_range_parameter_count: usize) -> f64 {
        let index = 100.0
            - contamination_score * self.config.contamination_penalty
            - out_of_range_parameter_count as f64 * self.config.parameter_penalty;

        round_to(index.clamp(0.0, 100.0), 1)
    }

    pub fn grade(&self, index: f64) -> QualityGrade {
        QualityGrade::from_index(index)
    }

    pub fn health_risk_tier(&self, readings: &[ContaminationReading], parameters: &[ParameterReading]) -> RiskTier {
        self.health_risks(readings, parameters).0
    }

    /// Overall tier plus the individual findings behind it.
    ///
    /// The tier only ever escalates while walking the findings.
    pub fn health_risks(
        &self,
        readings: &[ContaminationReading],
        parameters: &[ParameterReading],
    ) -> (RiskTier, Vec<HealthRisk>) {
        let mut tier = RiskTier::Low;
        let mut risks = Vec::new();

        for reading in readings {
            let severity = if reading.severity > self.config.high_severity {
                RiskTier::High
            } else if reading.severity > self.config.medium_severity {
                RiskTier::Medium
            } else {
                continue;
            };

            risks.push(HealthRisk::contamination(reading.kind, severity));
            tier = tier.max(severity);
        }

        for reading in parameters.iter().filter(|p| !p.in_range()) {
            risks.push(HealthRisk::parameter(reading));
            tier = tier.max(RiskTier::Medium);
        }

        (tier, risks)
    }

    /// Full analysis of one water sample
    pub fn analyze(&self, readings: &[ContaminationReading], parameters: &[ParameterReading]) -> WaterQualityResult {
        let contamination: Vec<ContaminationReading> = readings
            .iter()
            .filter(|r| r.coverage_percent > self.config.detection_threshold_percent)
            .map(|r| ContaminationReading::with_severity(r.kind, r.coverage_percent, r.severity))
            .collect();

        let contamination_score = self.contamination_score(&contamination);

        let out_of_range_parameters: Vec<WaterParameter> = parameters
            .iter()
            .filter(|p| !p.in_range())
            .map(|p| p.parameter)
            .collect();

        let index = self.quality_index(contamination_score, out_of_range_parameters.len());
        let (risk_tier, health_risks) = self.health_risks(&contamination, parameters);

        let covered: f64 = contamination.iter().map(|r| r.coverage_percent).sum();
        let clean_water_percentage = round_to((100.0 - covered).max(0.0), 1);

        debug!(
            index,
            contamination_score,
            out_of_range = out_of_range_parameters.len(),
            tier = risk_tier.as_str(),
            "Analyzed water sample"
        );

        WaterQualityResult {
            index,
            grade: self.grade(index),
            contamination_score,
            contamination,
            clean_water_percentage,
            out_of_range_parameters,
            risk_tier,
            health_risks,
            health_advisory: advisory::health_advisory(risk_tier).to_string(),
            safe_for_consumption: risk_tier == RiskTier::Low,
            recommendations: advisory::recommendations(index, contamination_score),
        }
    }
}
