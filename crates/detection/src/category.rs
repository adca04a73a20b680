use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

use crate::DetectionError;

/// Contamination object classes an external detector can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionCategory {
    PlasticBottle,
    PlasticBag,
    FoodWrapper,
    CigaretteButt,
    AluminumCan,
    GlassBottle,
    PaperCup,
    Cardboard,
    OrganicWaste,
    Electronics,
    /// Fallback for labels outside the known table
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Plastic,
    Metal,
    Glass,
    Paper,
    Organic,
    Electronic,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalBin {
    PlasticRecycling,
    MetalRecycling,
    GlassRecycling,
    PaperRecycling,
    Compost,
    EWaste,
    GeneralWaste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecyclingInfo {
    pub recyclable: bool,
    pub bin: DisposalBin,
    pub tip: &'static str,
}

const DEFAULT_RECYCLING: RecyclingInfo = RecyclingInfo {
    recyclable: false,
    bin: DisposalBin::GeneralWaste,
    tip: "Check with local recycling guidelines",
};

impl DetectionCategory {
    /// Every category the detector is trained on (excludes `Unknown`)
    pub const KNOWN: [DetectionCategory; 10] = [
        DetectionCategory::PlasticBottle,
        DetectionCategory::PlasticBag,
        DetectionCategory::FoodWrapper,
        DetectionCategory::CigaretteButt,
        DetectionCategory::AluminumCan,
        DetectionCategory::GlassBottle,
        DetectionCategory::PaperCup,
        DetectionCategory::Cardboard,
        DetectionCategory::OrganicWaste,
        DetectionCategory::Electronics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionCategory::PlasticBottle => "plastic_bottle",
            DetectionCategory::PlasticBag => "plastic_bag",
            DetectionCategory::FoodWrapper => "food_wrapper",
            DetectionCategory::CigaretteButt => "cigarette_butt",
            DetectionCategory::AluminumCan => "aluminum_can",
            DetectionCategory::GlassBottle => "glass_bottle",
            DetectionCategory::PaperCup => "paper_cup",
            DetectionCategory::Cardboard => "cardboard",
            DetectionCategory::OrganicWaste => "organic_waste",
            DetectionCategory::Electronics => "electronics",
            DetectionCategory::Unknown => "unknown",
        }
    }

    pub fn base_confidence(&self) -> f64 {
        match self {
            DetectionCategory::PlasticBottle => 0.85,
            DetectionCategory::AluminumCan => 0.82,
            DetectionCategory::GlassBottle => 0.78,
            DetectionCategory::PlasticBag => 0.65,
            DetectionCategory::FoodWrapper => 0.72,
            DetectionCategory::CigaretteButt => 0.68,
            DetectionCategory::PaperCup => 0.75,
            DetectionCategory::Cardboard => 0.80,
            DetectionCategory::OrganicWaste => 0.60,
            DetectionCategory::Electronics => 0.88,
            DetectionCategory::Unknown => 0.70,
        }
    }

    /// Estimated mass per bounding-box pixel, in kg
    pub fn weight_per_pixel(&self) -> f64 {
        match self {
            DetectionCategory::PlasticBottle => 0.00008,
            DetectionCategory::AluminumCan => 0.00005,
            DetectionCategory::GlassBottle => 0.0002,
            DetectionCategory::PlasticBag => 0.00001,
            DetectionCategory::FoodWrapper => 0.00002,
            DetectionCategory::CigaretteButt => 0.000005,
            DetectionCategory::PaperCup => 0.00003,
            DetectionCategory::Cardboard => 0.00004,
            DetectionCategory::OrganicWaste => 0.0001,
            DetectionCategory::Electronics => 0.0005,
            DetectionCategory::Unknown => 0.00005,
        }
    }

    pub fn material(&self) -> Material {
        match self {
            DetectionCategory::PlasticBottle
            | DetectionCategory::PlasticBag
            | DetectionCategory::FoodWrapper => Material::Plastic,
            DetectionCategory::AluminumCan => Material::Metal,
            DetectionCategory::GlassBottle => Material::Glass,
            DetectionCategory::PaperCup | DetectionCategory::Cardboard => Material::Paper,
            DetectionCategory::OrganicWaste => Material::Organic,
            DetectionCategory::Electronics => Material::Electronic,
            DetectionCategory::CigaretteButt | DetectionCategory::Unknown => Material::Mixed,
        }
    }

    pub fn recyclability(&self) -> RecyclingInfo {
        let (recyclable, bin, tip) = match self {
            DetectionCategory::PlasticBottle => (
                true,
                DisposalBin::PlasticRecycling,
                "Remove cap and rinse before recycling",
            ),
            DetectionCategory::PlasticBag => (
                false,
                DisposalBin::GeneralWaste,
                "Take to grocery store plastic bag recycling",
            ),
            DetectionCategory::FoodWrapper => (
                false,
                DisposalBin::GeneralWaste,
                "Most food wrappers are not recyclable",
            ),
            DetectionCategory::CigaretteButt => (
                false,
                DisposalBin::GeneralWaste,
                "Cigarette butts are toxic waste - dispose properly",
            ),
            DetectionCategory::AluminumCan => {
                (true, DisposalBin::MetalRecycling, "Rinse and crush to save space")
            }
            DetectionCategory::GlassBottle => (
                true,
                DisposalBin::GlassRecycling,
                "Remove caps and rinse before recycling",
            ),
            DetectionCategory::PaperCup => (
                false,
                DisposalBin::GeneralWaste,
                "Plastic lining makes most paper cups non-recyclable",
            ),
            DetectionCategory::Cardboard => {
                (true, DisposalBin::PaperRecycling, "Remove tape and flatten boxes")
            }
            DetectionCategory::OrganicWaste => (
                false,
                DisposalBin::Compost,
                "Perfect for composting - turn into soil!",
            ),
            DetectionCategory::Electronics => (
                true,
                DisposalBin::EWaste,
                "Take to certified e-waste recycling center",
            ),
            DetectionCategory::Unknown => return DEFAULT_RECYCLING,
        };

        RecyclingInfo {
            recyclable,
            bin,
            tip,
        }
    }

    /// Map a detector label to a category, falling back to `Unknown`
    pub fn from_label_lossy(label: &str) -> Self {
        match label.parse() {
            Ok(category) => category,
            Err(e) => {
                warn!(label, error = %e, "Unrecognized detection label, using default category");
                DetectionCategory::Unknown
            }
        }
    }
}

impl FromStr for DetectionCategory {
    type Err = DetectionError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(label);
        DetectionCategory::KNOWN
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DetectionError::InvalidCategory(label.to_string()))
    }
}

impl std::fmt::Display for DetectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, collapse any run of separators into `_`, trim stray underscores
pub fn normalize_label(label: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

    let lowered = label.trim().to_lowercase();
    re.replace_all(&lowered, "_").trim_matches('_').to_string()
}

/// Recycling guidance for a raw label; never fails
pub fn category_recyclability(label: &str) -> RecyclingInfo {
    label
        .parse::<DetectionCategory>()
        .map(|c| c.recyclability())
        .unwrap_or(DEFAULT_RECYCLING)
}
