use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use spatial::GeoPoint;
use water::RiskTier;

use crate::factors::ActiveFactor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub detection: f64,
    pub water: f64,
    pub proximity: f64,
    pub environmental: f64,
}

impl ComponentScores {
    pub fn total(&self) -> f64 {
        self.detection + self.water + self.proximity + self.environmental
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryImpact {
    pub estimated_cost_usd: f64,
    pub impact_level: RiskTier,
}

/// Combined environmental health risk for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub location: GeoPoint,
    pub component_scores: ComponentScores,
    pub combined_score: f64,
    pub tier: RiskTier,
    pub active_factors: Vec<ActiveFactor>,
    pub predicted_diseases: BTreeSet<String>,
    pub priority_score: f64,
    pub estimated_population_affected: u64,
    pub impact: MonetaryImpact,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// Zero-score assessment carrying the reason the computation was abandoned
    pub fn failed(location: GeoPoint, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
            location,
            component_scores: ComponentScores::default(),
            combined_score: 0.0,
            tier: RiskTier::Low,
            active_factors: Vec::new(),
            predicted_diseases: BTreeSet::new(),
            priority_score: 0.0,
            estimated_population_affected: 0,
            impact: MonetaryImpact {
                estimated_cost_usd: 0.0,
                impact_level: RiskTier::Low,
            },
            recommendations: Vec::new(),
        }
    }
}
