use serde::{Deserialize, Serialize};

use spatial::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteDifficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl SiteDifficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            SiteDifficulty::Easy => 1.0,
            SiteDifficulty::Medium => 1.5,
            SiteDifficulty::Hard => 2.5,
            SiteDifficulty::Extreme => 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub equipment: f64,
    pub transport: f64,
    pub disposal: f64,
    pub overhead: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupEstimate {
    pub total_cost_usd: f64,
    pub breakdown: CostBreakdown,
    pub crew_size: u32,
    pub duration_hours: u32,
    pub specialized_equipment: bool,
}

/// Cleanup cost rates in USD
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupCostModel {
    pub labor_per_item: f64,
    pub labor_per_kg: f64,
    pub equipment_share: f64,
    pub transport_share: f64,
    pub disposal_per_kg: f64,
    pub overhead_share: f64,
}

impl Default for CleanupCostModel {
    fn default() -> Self {
        Self {
            labor_per_item: 2.5,
            labor_per_kg: 3.0,
            equipment_share: 0.3,
            transport_share: 0.2,
            disposal_per_kg: 1.5,
            overhead_share: 0.15,
        }
    }
}

impl CleanupCostModel {
    pub fn estimate(&self, items: u32, weight_kg: f64, difficulty: SiteDifficulty) -> CleanupEstimate {
        let weight_kg = weight_kg.max(0.0);

        let labor = (items as f64 * self.labor_per_item + weight_kg * self.labor_per_kg) * difficulty.multiplier();
        let equipment = labor * self.equipment_share;
        let transport = labor * self.transport_share;
        let disposal = weight_kg * self.disposal_per_kg;
        let overhead = (labor + equipment + transport) * self.overhead_share;
        let total = labor + equipment + transport + disposal + overhead;

        CleanupEstimate {
            total_cost_usd: round_to(total, 2),
            breakdown: CostBreakdown {
                labor: round_to(labor, 2),
                equipment: round_to(equipment, 2),
                transport: round_to(transport, 2),
                disposal: round_to(disposal, 2),
                overhead: round_to(overhead, 2),
            },
            crew_size: ((weight_kg / 20.0) as u32 + 1).max(2),
            duration_hours: ((weight_kg / 10.0) as u32 + items / 50).max(2),
            specialized_equipment: weight_kg > 100.0 || items > 500,
        }
    }
}
