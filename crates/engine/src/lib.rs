pub mod batch;
pub mod config;
pub mod metrics;

pub use batch::{BatchRunner, Request, Response, WaterSample};
pub use config::{ConcurrencyConfig, EngineConfig, LogFormat, LoggingConfig, SiteModel};
pub use metrics::{Metrics, MetricsSnapshot, Operation, TimedOperation};

use std::sync::Arc;

use detection::{
    category_recyclability, environmental_impact, DetectionScorer, DetectionSummary, EnvironmentalImpact,
    RawDetection, RecyclingInfo,
};
use hotspots::{HotspotGenerator, HotspotRecord, WaterZone, WaterZoneGenerator};
use risk::{
    CleanupConditions, DiseasePredictor, EnvironmentalConditions, RiskAggregator, RiskAssessment, SiteEstimator,
};
use spatial::{GeoBounds, GeoPoint, HeatmapPoint, SpatialError, SpatialIntensityField};
use water::{ContaminationReading, ParameterReading, WaterQualityResult, WaterQualityScorer};

/// One instance of every scoring component, built from a single configuration
#[derive(Clone)]
pub struct Engine {
    field: Arc<SpatialIntensityField>,
    detection: DetectionScorer,
    water: WaterQualityScorer,
    risk: RiskAggregator,
    hotspots: HotspotGenerator,
    zones: WaterZoneGenerator,
    estimator: Arc<dyn SiteEstimator>,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        let field = Arc::new(SpatialIntensityField::new(config.field.clone()));

        let estimator: Arc<dyn SiteEstimator> = match &config.sites {
            SiteModel::Fixed(fixed) => Arc::new(*fixed),
            SiteModel::Survey(survey) => Arc::new(survey.clone()),
        };

        Self {
            detection: DetectionScorer::new(config.detection.clone()),
            water: WaterQualityScorer::new(config.water.clone()),
            risk: RiskAggregator::new(config.risk.clone()),
            hotspots: HotspotGenerator::new(config.hotspots.clone(), field.clone()),
            zones: WaterZoneGenerator::new(config.hotspots.water_zones.clone(), config.hotspots.seed),
            field,
            estimator,
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn SiteEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_disease_predictor(mut self, predictor: Arc<dyn DiseasePredictor>) -> Self {
        self.risk = RiskAggregator::with_predictor(self.risk.config().clone(), predictor);
        self
    }

    pub fn score_detections(&self, raw: &[RawDetection]) -> DetectionSummary {
        self.detection.score_batch(raw)
    }

    pub fn score_water(
        &self,
        contamination: &[ContaminationReading],
        parameters: &[ParameterReading],
    ) -> WaterQualityResult {
        self.water.analyze(contamination, parameters)
    }

    /// Site factors come from the configured estimator
    pub fn assess_risk(
        &self,
        location: GeoPoint,
        detection: Option<&DetectionSummary>,
        water: Option<&WaterQualityResult>,
    ) -> RiskAssessment {
        let site = self.estimator.estimate(&location);
        self.risk.combine(location, detection, water, &site)
    }

    pub fn generate_hotspots(&self, bounds: &GeoBounds, zoom_level: u8) -> Result<Vec<HotspotRecord>, SpatialError> {
        self.hotspots.generate(bounds, zoom_level, None)
    }

    /// The `limit` highest-priority hotspots
    pub fn top_hotspots(
        &self,
        bounds: &GeoBounds,
        zoom_level: u8,
        limit: usize,
    ) -> Result<Vec<HotspotRecord>, SpatialError> {
        self.hotspots.generate(bounds, zoom_level, Some(limit))
    }

    pub fn heatmap(&self, bounds: &GeoBounds, zoom_level: u8) -> Result<Vec<HeatmapPoint>, SpatialError> {
        spatial::heatmap(&self.field, bounds, zoom_level)
    }

    pub fn water_zones(&self, bounds: &GeoBounds, zoom_level: u8) -> Result<Vec<WaterZone>, SpatialError> {
        self.zones.generate(bounds, zoom_level)
    }

    /// Falls back to the estimator's conditions when none are observed
    pub fn cleanup_conditions(
        &self,
        location: GeoPoint,
        observed: Option<&EnvironmentalConditions>,
    ) -> CleanupConditions {
        let conditions = observed
            .copied()
            .unwrap_or_else(|| self.estimator.conditions(&location));
        CleanupConditions::from_conditions(&conditions)
    }

    pub fn environmental_impact(&self, summary: &DetectionSummary) -> Option<EnvironmentalImpact> {
        environmental_impact(summary)
    }

    pub fn recycling_info(&self, label: &str) -> RecyclingInfo {
        category_recyclability(label)
    }
}
