use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use spatial::{round_to, GeoBounds, GeoPoint, SpatialError};

use crate::{query_rng, record_id};

const ZONE_LAYER: &[u8] = b"water_zones";

const CONTAMINATION_SOURCES: [&str; 8] = [
    "industrial_discharge",
    "sewage_overflow",
    "agricultural_runoff",
    "solid_waste_leaching",
    "chemical_spill",
    "urban_stormwater",
    "illegal_dumping",
    "oil_spill",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterZoneConfig {
    /// Zones per square degree at zoom 10; scales linearly with zoom
    pub base_density: f64,
    pub min_zones: usize,
    pub max_zones: usize,
    /// Zones above this contamination level need treatment
    pub treatment_threshold: f64,
}

impl Default for WaterZoneConfig {
    fn default() -> Self {
        Self {
            base_density: 50.0,
            min_zones: 2,
            max_zones: 50,
            treatment_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterBodyType {
    River,
    Lake,
    Pond,
    Stream,
    Canal,
    Reservoir,
    Groundwater,
}

impl WaterBodyType {
    const ALL: [WaterBodyType; 7] = [
        WaterBodyType::River,
        WaterBodyType::Lake,
        WaterBodyType::Pond,
        WaterBodyType::Stream,
        WaterBodyType::Canal,
        WaterBodyType::Reservoir,
        WaterBodyType::Groundwater,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl HealthRiskLevel {
    pub fn from_contamination(level: f64) -> Self {
        if level >= 0.8 {
            HealthRiskLevel::Severe
        } else if level >= 0.6 {
            HealthRiskLevel::High
        } else if level >= 0.4 {
            HealthRiskLevel::Moderate
        } else {
            HealthRiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Bod,
    Cod,
    TotalSuspendedSolids,
    Ammonia,
    Nitrates,
    Phosphates,
    HeavyMetals,
    ColiformBacteria,
    OilAndGrease,
}

impl Pollutant {
    pub const ALL: [Pollutant; 9] = [
        Pollutant::Bod,
        Pollutant::Cod,
        Pollutant::TotalSuspendedSolids,
        Pollutant::Ammonia,
        Pollutant::Nitrates,
        Pollutant::Phosphates,
        Pollutant::HeavyMetals,
        Pollutant::ColiformBacteria,
        Pollutant::OilAndGrease,
    ];

    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::HeavyMetals => "µg/L",
            Pollutant::ColiformBacteria => "CFU/100ml",
            _ => "mg/L",
        }
    }

    /// Any detectable coliform count is over the limit
    pub fn safe_limit(&self) -> f64 {
        match self {
            Pollutant::Bod => 3.0,
            Pollutant::Cod => 10.0,
            Pollutant::TotalSuspendedSolids => 30.0,
            Pollutant::Ammonia => 0.5,
            Pollutant::Nitrates => 45.0,
            Pollutant::Phosphates => 0.1,
            Pollutant::HeavyMetals => 50.0,
            Pollutant::ColiformBacteria => 0.0,
            Pollutant::OilAndGrease => 10.0,
        }
    }

    /// Level a clean sample is scaled from; coliform has no safe level to scale
    fn reference_level(&self) -> f64 {
        match self {
            Pollutant::ColiformBacteria => 1.0,
            other => other.safe_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub detected_level: f64,
    pub unit: String,
    pub safe_limit: f64,
    pub exceeds_limit: bool,
    /// Detected over safe level, capped at 5
    pub risk_factor: f64,
}

impl PollutantReading {
    fn sample(pollutant: Pollutant, contamination_level: f64, rng: &mut StdRng) -> Self {
        let base_multiplier = 1.0 + contamination_level * 5.0;
        let detected = pollutant.reference_level() * base_multiplier * rng.gen_range(0.5..2.0);
        let safe_limit = pollutant.safe_limit();

        let risk_factor = if safe_limit > 0.0 {
            (detected / safe_limit).min(5.0)
        } else if detected > 0.0 {
            5.0
        } else {
            0.0
        };

        Self {
            pollutant,
            detected_level: round_to(detected, 3),
            unit: pollutant.unit().to_string(),
            safe_limit,
            exceeds_limit: detected > safe_limit,
            risk_factor: round_to(risk_factor, 3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterParameters {
    pub ph: f64,
    pub dissolved_oxygen_mg_l: f64,
    pub turbidity_ntu: f64,
    pub temperature_c: f64,
    pub conductivity_us_cm: f64,
}

impl WaterParameters {
    fn sample(contamination_level: f64, rng: &mut StdRng) -> Self {
        Self {
            ph: round_to(rng.gen_range(6.0..9.0), 1),
            dissolved_oxygen_mg_l: round_to(rng.gen_range(2.0..12.0), 1),
            turbidity_ntu: round_to(contamination_level * rng.gen_range(10.0..100.0), 1),
            temperature_c: round_to(rng.gen_range(15.0..35.0), 1),
            conductivity_us_cm: round_to(rng.gen_range(100.0..2000.0), 1),
        }
    }
}

/// A contaminated stretch of surface or ground water
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterZone {
    pub id: String,
    pub location: GeoPoint,
    pub contamination_level: f64,
    pub affected_radius_km: f64,
    pub water_body: WaterBodyType,
    pub contamination_sources: BTreeSet<String>,
    pub pollutants: Vec<PollutantReading>,
    pub water_quality_index: f64,
    pub health_risk: HealthRiskLevel,
    pub monitoring_frequency: MonitoringFrequency,
    pub treatment_required: bool,
    pub estimated_cleanup_cost_usd: f64,
    pub parameters: WaterParameters,
}

/// Water-contamination layer served next to the hotspot layer
#[derive(Debug, Clone)]
pub struct WaterZoneGenerator {
    config: WaterZoneConfig,
    seed: u64,
}

impl WaterZoneGenerator {
    pub fn new(config: WaterZoneConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// `clamp(floor(area * density * zoom / 10), min, max)`
    pub fn zone_count(&self, bounds: &GeoBounds, zoom_level: u8) -> usize {
        let raw = (bounds.area() * self.config.base_density * f64::from(zoom_level) / 10.0).floor();
        let min = self.config.min_zones;
        let max = self.config.max_zones.max(min);

        if raw.is_finite() && raw > 0.0 {
            (raw.min(max as f64) as usize).clamp(min, max)
        } else {
            min
        }
    }

    /// Zones inside `bounds` in sampling order; identical queries return identical zones
    pub fn generate(&self, bounds: &GeoBounds, zoom_level: u8) -> Result<Vec<WaterZone>, SpatialError> {
        bounds.validate()?;

        let count = self.zone_count(bounds, zoom_level);
        let mut rng = query_rng(self.seed, ZONE_LAYER, bounds, zoom_level);

        let zones: Vec<WaterZone> = (0..count)
            .map(|index| {
                let lat = rng.gen_range(bounds.lat_min..bounds.lat_max);
                let lng = rng.gen_range(bounds.lng_min..bounds.lng_max);
                let id = record_id(ZONE_LAYER, bounds, zoom_level, index);
                self.zone(id, GeoPoint::new(lat, lng), &mut rng)
            })
            .collect();

        debug!(count = zones.len(), zoom_level, "Generated water zones");
        Ok(zones)
    }

    fn zone(&self, id: String, location: GeoPoint, rng: &mut StdRng) -> WaterZone {
        // Every derived field reads the reported level
        let level = round_to(rng.gen_range(0.2..0.95), 3);
        let affected_radius_km = round_to(rng.gen_range(0.1..2.0), 2);
        let water_body = *WaterBodyType::ALL.choose(rng).unwrap_or(&WaterBodyType::River);

        let source_count = rng.gen_range(1..=3);
        let contamination_sources = CONTAMINATION_SOURCES
            .choose_multiple(rng, source_count)
            .map(|s| s.to_string())
            .collect();

        let pollutant_count = rng.gen_range(3..=7);
        let selected: Vec<Pollutant> = Pollutant::ALL.choose_multiple(rng, pollutant_count).copied().collect();
        let pollutants = selected
            .into_iter()
            .map(|p| PollutantReading::sample(p, level, rng))
            .collect();

        let monitoring_frequency = match rng.gen_range(0..3) {
            0 => MonitoringFrequency::Daily,
            1 => MonitoringFrequency::Weekly,
            _ => MonitoringFrequency::Monthly,
        };
        let estimated_cleanup_cost_usd = round_to(level * rng.gen_range(10_000.0..100_000.0), 2);
        let parameters = WaterParameters::sample(level, rng);

        WaterZone {
            id,
            location,
            contamination_level: level,
            affected_radius_km,
            water_body,
            contamination_sources,
            pollutants,
            water_quality_index: round_to((100.0 - level * 100.0).max(0.0), 1),
            health_risk: HealthRiskLevel::from_contamination(level),
            monitoring_frequency,
            treatment_required: level > self.config.treatment_threshold,
            estimated_cleanup_cost_usd,
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> WaterZoneGenerator {
        WaterZoneGenerator::new(WaterZoneConfig::default(), 42)
    }

    #[test]
    fn test_zone_count_scales_with_zoom() {
        let generator = generator();
        let bounds = GeoBounds::new(0.0, 0.2, 0.0, 0.2).unwrap();
        // 0.04 * 50 * 1.0 = 2, 0.04 * 50 * 2.0 = 4
        assert_eq!(generator.zone_count(&bounds, 10), 2);
        assert_eq!(generator.zone_count(&bounds, 20), 4);
        assert_eq!(generator.zone_count(&bounds, 0), 2);

        let huge = GeoBounds::new(-10.0, 10.0, -10.0, 10.0).unwrap();
        assert_eq!(generator.zone_count(&huge, 12), 50);
    }

    #[test]
    fn test_zone_fields_follow_contamination_level() {
        let bounds = GeoBounds::new(28.5, 29.5, 77.0, 78.0).unwrap();
        let zones = generator().generate(&bounds, 12).unwrap();
        assert_eq!(zones.len(), 50);

        for zone in &zones {
            assert!(bounds.contains(&zone.location));
            assert!((0.2..=0.95).contains(&zone.contamination_level));
            assert!((zone.water_quality_index - (100.0 - zone.contamination_level * 100.0)).abs() < 0.06);
            assert_eq!(
                zone.health_risk,
                HealthRiskLevel::from_contamination(zone.contamination_level)
            );
            assert!((1..=3).contains(&zone.contamination_sources.len()));
            assert!((3..=7).contains(&zone.pollutants.len()));
            assert!((0.1..=2.0).contains(&zone.affected_radius_km));
            for reading in &zone.pollutants {
                assert!(reading.risk_factor <= 5.0);
                assert!(reading.detected_level > 0.0);
            }
        }
    }

    #[test]
    fn test_treatment_threshold() {
        let bounds = GeoBounds::new(28.5, 29.5, 77.0, 78.0).unwrap();
        for zone in generator().generate(&bounds, 12).unwrap() {
            assert_eq!(zone.treatment_required, zone.contamination_level > 0.4);
        }
    }

    #[test]
    fn test_coliform_always_exceeds_limit() {
        let mut rng = query_rng(1, b"test", &GeoBounds::new(0.0, 1.0, 0.0, 1.0).unwrap(), 10);
        let reading = PollutantReading::sample(Pollutant::ColiformBacteria, 0.5, &mut rng);
        assert!(reading.exceeds_limit);
        assert_eq!(reading.risk_factor, 5.0);
        assert_eq!(reading.unit, "CFU/100ml");
    }

    #[test]
    fn test_zones_are_deterministic_and_distinct_from_hotspots() {
        let bounds = GeoBounds::new(10.0, 10.5, 20.0, 20.5).unwrap();
        let a = generator().generate(&bounds, 12).unwrap();
        let b = generator().generate(&bounds, 12).unwrap();
        assert_eq!(a, b);

        let hotspot_id = record_id(b"", &bounds, 12, 0);
        assert_ne!(a[0].id, hotspot_id);
    }

    #[test]
    fn test_health_risk_breakpoints() {
        assert_eq!(HealthRiskLevel::from_contamination(0.39), HealthRiskLevel::Low);
        assert_eq!(HealthRiskLevel::from_contamination(0.4), HealthRiskLevel::Moderate);
        assert_eq!(HealthRiskLevel::from_contamination(0.6), HealthRiskLevel::High);
        assert_eq!(HealthRiskLevel::from_contamination(0.8), HealthRiskLevel::Severe);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let bounds = GeoBounds {
            lat_min: 1.0,
            lat_max: 0.0,
            lng_min: 0.0,
            lng_max: 1.0,
        };
        assert!(matches!(
            generator().generate(&bounds, 12),
            Err(SpatialError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_zone_serialization() {
        let bounds = GeoBounds::new(0.0, 0.2, 0.0, 0.2).unwrap();
        let zones = generator().generate(&bounds, 10).unwrap();
        let value = serde_json::to_value(&zones[0]).unwrap();
        assert!(value["water_body"].is_string());
        assert!(value["pollutants"][0]["pollutant"].is_string());
    }
}
