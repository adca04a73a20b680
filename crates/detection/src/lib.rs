pub mod category;
pub mod impact;
pub mod schema;

pub use category::{
    category_recyclability, normalize_label, DetectionCategory, DisposalBin, Material, RecyclingInfo,
};
pub use impact::{environmental_impact, EnvironmentalImpact, ExposureLevel};
pub use schema::{BoundingBox, Detection, DetectionSummary, RawDetection};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use spatial::round_to;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("invalid detection category: {0}")]
    InvalidCategory(String),

    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Box area (px²) at which the size bonus saturates
    pub size_saturation_area: f64,
    pub size_bonus: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            max_confidence: 0.95,
            size_saturation_area: 10_000.0,
            size_bonus: 0.1,
        }
    }
}

/// Assigns confidence and mass to raw detections and folds them into a summary
#[derive(Debug, Clone)]
pub struct DetectionScorer {
    config: ScorerConfig,
}

impl DetectionScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Confidence and estimated weight (kg) for one box of the given category
    pub fn score(&self, category: DetectionCategory, box_width: f64, box_height: f64) -> (f64, f64) {
        let area = (box_width * box_height).max(0.0);

        // Larger objects are easier to classify
        let size_factor = (area / self.config.size_saturation_area).min(1.0);
        let confidence = round_to(
            category.base_confidence() + size_factor * self.config.size_bonus,
            3,
        )
        .clamp(self.config.min_confidence, self.config.max_confidence);

        let weight = round_to(area * category.weight_per_pixel(), 4);

        (confidence, weight)
    }

    pub fn score_detection(&self, raw: &RawDetection) -> Detection {
        let bbox = raw.bounding_box;
        let (confidence, weight) = self.score(raw.category, bbox.width(), bbox.height());
        Detection::new(raw.category, confidence, bbox, weight)
    }

    /// Score a detector batch, dropping boxes that fail validation
    pub fn score_batch(&self, raw: &[RawDetection]) -> DetectionSummary {
        let detections: Vec<Detection> = raw
            .iter()
            .filter(|r| match r.bounding_box.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(category = %r.category, error = %e, "Skipping malformed detection");
                    false
                }
            })
            .map(|r| self.score_detection(r))
            .collect();

        self.summarize(detections)
    }

    pub fn summarize(&self, detections: Vec<Detection>) -> DetectionSummary {
        let total_items = detections.len();
        let average_confidence = if total_items == 0 {
            0.0
        } else {
            detections.iter().map(|d| d.confidence).sum::<f64>() / total_items as f64
        };
        let total_weight: f64 = detections.iter().map(|d| d.estimated_weight_kg).sum();

        debug!(
            total_items,
            average_confidence,
            total_weight_kg = total_weight,
            "Summarized detections"
        );

        DetectionSummary {
            success: true,
            error: None,
            total_items,
            average_confidence: round_to(average_confidence, 3),
            total_weight_kg: round_to(total_weight, 2),
            detections,
        }
    }
}
