use crate::factors::RiskFactor;

/// Maps an active risk factor to the diseases it makes likely
pub trait DiseasePredictor: Send + Sync {
    fn predict(&self, factor: RiskFactor, combined_score: f64) -> Vec<String>;
}

/// Reports every disease in the factor's table, independent of score
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorTablePredictor;

impl DiseasePredictor for FactorTablePredictor {
    fn predict(&self, factor: RiskFactor, _combined_score: f64) -> Vec<String> {
        factor.diseases().iter().map(|d| d.to_string()).collect()
    }
}
