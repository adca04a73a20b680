use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContaminantKind {
    AlgaeBloom,
    OilSpill,
    Sediment,
    Foam,
    Debris,
}

impl ContaminantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContaminantKind::AlgaeBloom => "algae_bloom",
            ContaminantKind::OilSpill => "oil_spill",
            ContaminantKind::Sediment => "sediment",
            ContaminantKind::Foam => "foam",
            ContaminantKind::Debris => "debris",
        }
    }

    pub fn default_severity(&self) -> f64 {
        match self {
            ContaminantKind::AlgaeBloom => 0.8,
            ContaminantKind::OilSpill => 0.9,
            ContaminantKind::Sediment => 0.6,
            ContaminantKind::Foam => 0.4,
            ContaminantKind::Debris => 0.7,
        }
    }

    fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContaminationReading {
    #[serde(rename = "contaminant")]
    pub kind: ContaminantKind,
    pub coverage_percent: f64,
    pub severity: f64,
}

impl ContaminationReading {
    /// Reading with the contaminant's standard severity
    pub fn new(kind: ContaminantKind, coverage_percent: f64) -> Self {
        Self::with_severity(kind, coverage_percent, kind.default_severity())
    }

    pub fn with_severity(kind: ContaminantKind, coverage_percent: f64, severity: f64) -> Self {
        Self {
            kind,
            coverage_percent: coverage_percent.clamp(0.0, 100.0),
            severity: severity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterParameter {
    PhLevel,
    DissolvedOxygen,
    Turbidity,
    Temperature,
    Conductivity,
}

impl WaterParameter {
    /// Inclusive acceptable range
    pub fn acceptable_range(&self) -> (f64, f64) {
        match self {
            WaterParameter::PhLevel => (6.5, 8.5),
            WaterParameter::DissolvedOxygen => (5.0, 14.0),
            WaterParameter::Turbidity => (0.0, 4.0),
            WaterParameter::Temperature => (10.0, 30.0),
            WaterParameter::Conductivity => (50.0, 500.0),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WaterParameter::PhLevel => "pH",
            WaterParameter::DissolvedOxygen => "mg/L",
            WaterParameter::Turbidity => "NTU",
            WaterParameter::Temperature => "°C",
            WaterParameter::Conductivity => "µS/cm",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterParameter::PhLevel => "ph_level",
            WaterParameter::DissolvedOxygen => "dissolved_oxygen",
            WaterParameter::Turbidity => "turbidity",
            WaterParameter::Temperature => "temperature",
            WaterParameter::Conductivity => "conductivity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReading {
    pub parameter: WaterParameter,
    pub value: f64,
}

impl ParameterReading {
    pub fn new(parameter: WaterParameter, value: f64) -> Self {
        Self { parameter, value }
    }

    /// NaN readings count as out of range
    pub fn in_range(&self) -> bool {
        let (min, max) = self.parameter.acceptable_range();
        self.value >= min && self.value <= max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
}

impl QualityGrade {
    pub fn from_index(index: f64) -> Self {
        if index >= 90.0 {
            QualityGrade::APlus
        } else if index >= 80.0 {
            QualityGrade::A
        } else if index >= 70.0 {
            QualityGrade::B
        } else if index >= 60.0 {
            QualityGrade::C
        } else {
            QualityGrade::F
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityGrade::APlus => "A+ (Excellent)",
            QualityGrade::A => "A (Good)",
            QualityGrade::B => "B (Fair)",
            QualityGrade::C => "C (Marginal)",
            QualityGrade::F => "F (Poor)",
        }
    }
}

/// Ordinal risk classification; ordering is `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRiskSource {
    Contamination,
    Parameter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRisk {
    pub source_type: HealthRiskSource,
    pub source: String,
    pub severity: RiskTier,
    pub description: String,
}

impl HealthRisk {
    pub(crate) fn contamination(kind: ContaminantKind, severity: RiskTier) -> Self {
        let description = match severity {
            RiskTier::High => format!("High levels of {} detected", kind.display_name()),
            _ => format!("Moderate {} contamination", kind.display_name()),
        };
        Self {
            source_type: HealthRiskSource::Contamination,
            source: kind.as_str().to_string(),
            severity,
            description,
        }
    }

    pub(crate) fn parameter(reading: &ParameterReading) -> Self {
        let (min, max) = reading.parameter.acceptable_range();
        Self {
            source_type: HealthRiskSource::Parameter,
            source: reading.parameter.as_str().to_string(),
            severity: RiskTier::Medium,
            description: format!(
                "{} of {} {} outside acceptable range {}-{}",
                reading.parameter.as_str().replace('_', " "),
                reading.value,
                reading.parameter.unit(),
                min,
                max
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityResult {
    pub index: f64,
    pub grade: QualityGrade,
    pub contamination_score: f64,
    pub contamination: Vec<ContaminationReading>,
    pub clean_water_percentage: f64,
    pub out_of_range_parameters: Vec<WaterParameter>,
    pub risk_tier: RiskTier,
    pub health_risks: Vec<HealthRisk>,
    pub health_advisory: String,
    pub safe_for_consumption: bool,
    pub recommendations: Vec<String>,
}

impl WaterQualityResult {
    pub fn has_contaminant(&self, kind: ContaminantKind) -> bool {
        self.contamination.iter().any(|r| r.kind == kind)
    }
}
