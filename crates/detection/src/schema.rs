use serde::{Deserialize, Deserializer, Serialize};

use crate::category::DetectionCategory;
use crate::DetectionError;

/// Pixel-space box, `(x1, y1)` top-left and `(x2, y2)` bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, DetectionError> {
        let bbox = Self { x1, y1, x2, y2 };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn validate(&self) -> Result<(), DetectionError> {
        let finite = [self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite());
        if !finite || self.x2 <= self.x1 || self.y2 <= self.y1 {
            return Err(DetectionError::InvalidBoundingBox(format!(
                "expected x2 > x1 and y2 > y1, got ({}, {}, {}, {})",
                self.x1, self.y1, self.x2, self.y2
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Unscored detector output: what an external model hands us
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(rename = "type", deserialize_with = "lossy_category")]
    pub category: DetectionCategory,
    pub bounding_box: BoundingBox,
}

/// Detector labels are free text; unrecognized ones score as `unknown`
fn lossy_category<'de, D>(deserializer: D) -> Result<DetectionCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    Ok(DetectionCategory::from_label_lossy(&label))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "type")]
    pub category: DetectionCategory,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
    pub estimated_weight_kg: f64,
    pub recyclable: bool,
    pub recycling_tip: String,
}

impl Detection {
    pub fn new(
        category: DetectionCategory,
        confidence: f64,
        bounding_box: BoundingBox,
        estimated_weight_kg: f64,
    ) -> Self {
        let recycling = category.recyclability();
        Self {
            category,
            confidence,
            bounding_box,
            estimated_weight_kg,
            recyclable: recycling.recyclable,
            recycling_tip: recycling.tip.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// False when the upstream detector failed; consumers then treat the data as absent
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_items: usize,
    pub average_confidence: f64,
    pub total_weight_kg: f64,
    pub detections: Vec<Detection>,
}

impl DetectionSummary {
    /// Summary for a detector run that produced no usable output
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
            total_items: 0,
            average_confidence: 0.0,
            total_weight_kg: 0.0,
            detections: Vec::new(),
        }
    }

    pub fn count_material(&self, material: crate::Material) -> usize {
        self.detections
            .iter()
            .filter(|d| d.category.material() == material)
            .count()
    }

    pub fn contains_category(&self, category: DetectionCategory) -> bool {
        self.detections.iter().any(|d| d.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_dimensions() {
        let bbox = BoundingBox::new(10.0, 20.0, 60.0, 120.0).unwrap();
        assert_eq!(bbox.width(), 50.0);
        assert_eq!(bbox.height(), 100.0);
        assert_eq!(bbox.area(), 5000.0);
    }

    #[test]
    fn test_bounding_box_rejects_inverted_corners() {
        assert!(BoundingBox::new(60.0, 20.0, 10.0, 120.0).is_err());
        assert!(BoundingBox::new(10.0, 20.0, 10.0, 120.0).is_err());
        assert!(BoundingBox::new(10.0, f64::NAN, 60.0, 120.0).is_err());
    }

    #[test]
    fn test_raw_detection_json_shape() {
        let json = r#"{"type": "glass_bottle", "bounding_box": {"x1": 0, "y1": 0, "x2": 10, "y2": 10}}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.category, DetectionCategory::GlassBottle);
        assert_eq!(raw.bounding_box.area(), 100.0);
    }

    #[test]
    fn test_raw_detection_accepts_free_text_labels() {
        let json = r#"{"type": "Plastic Bottle", "bounding_box": {"x1": 0, "y1": 0, "x2": 10, "y2": 10}}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.category, DetectionCategory::PlasticBottle);

        let json = r#"{"type": "tire", "bounding_box": {"x1": 0, "y1": 0, "x2": 10, "y2": 10}}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.category, DetectionCategory::Unknown);
    }

    #[test]
    fn test_failed_summary_is_empty() {
        let summary = DetectionSummary::failed("camera offline");
        assert!(!summary.success);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.error.as_deref(), Some("camera offline"));
    }
}
