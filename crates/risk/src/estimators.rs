use serde::{Deserialize, Serialize};

use spatial::GeoPoint;

const MAX_PROXIMITY_SCORE: f64 = 10.0;

/// Location-derived inputs to the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteFactors {
    pub proximity: f64,
    pub environmental: f64,
    /// People per km²
    pub population_density: f64,
}

/// Source of proximity and environmental factors for a location
pub trait SiteEstimator: Send + Sync {
    fn estimate(&self, location: &GeoPoint) -> SiteFactors;

    /// Weather and settlement conditions at a location
    fn conditions(&self, _location: &GeoPoint) -> EnvironmentalConditions {
        EnvironmentalConditions::default()
    }
}

/// Returns the same factors everywhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedEstimator {
    pub factors: SiteFactors,
}

impl Default for FixedEstimator {
    fn default() -> Self {
        Self {
            factors: SiteFactors {
                proximity: 1.0,
                environmental: 0.5,
                population_density: 5000.0,
            },
        }
    }
}

impl SiteEstimator for FixedEstimator {
    fn estimate(&self, _location: &GeoPoint) -> SiteFactors {
        self.factors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveSiteKind {
    School,
    Hospital,
    Residential,
    WaterSource,
    Playground,
}

impl SensitiveSiteKind {
    pub fn radius_km(&self) -> f64 {
        match self {
            SensitiveSiteKind::School => 0.5,
            SensitiveSiteKind::Hospital => 0.3,
            SensitiveSiteKind::Residential => 0.2,
            SensitiveSiteKind::WaterSource => 1.0,
            SensitiveSiteKind::Playground => 0.3,
        }
    }

    pub fn priority_multiplier(&self) -> f64 {
        match self {
            SensitiveSiteKind::School => 3.0,
            SensitiveSiteKind::Hospital => 2.5,
            SensitiveSiteKind::Residential => 2.0,
            SensitiveSiteKind::WaterSource => 4.0,
            SensitiveSiteKind::Playground => 2.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitiveSite {
    pub kind: SensitiveSiteKind,
    pub location: GeoPoint,
}

impl SensitiveSite {
    /// Linear falloff from the full multiplier at the site to zero at its radius
    pub fn contribution(&self, location: &GeoPoint) -> f64 {
        let radius = self.kind.radius_km();
        let distance = self.location.distance_km(location);
        if distance >= radius {
            return 0.0;
        }
        self.kind.priority_multiplier() * (1.0 - distance / radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalConditions {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub uv_index: f64,
    pub population_density: f64,
    /// 0 (none) to 1 (fully managed)
    pub waste_management_quality: f64,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            humidity_percent: 60.0,
            rainfall_mm: 10.0,
            wind_speed_kmh: 10.0,
            uv_index: 6.0,
            population_density: 5000.0,
            waste_management_quality: 0.5,
        }
    }
}

/// How local conditions amplify contamination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalModifiers {
    /// Heat, humidity and runoff carrying contaminants further
    pub spread: f64,
    /// Wind moving airborne particles off-site
    pub dispersion: f64,
    pub vector_breeding: f64,
    /// Crowding plus gaps in waste collection
    pub exposure: f64,
}

impl EnvironmentalModifiers {
    pub fn from_conditions(conditions: &EnvironmentalConditions) -> Self {
        let temperature = ((conditions.temperature_c - 20.0) / 20.0).clamp(0.0, 1.0);
        let humidity = ((conditions.humidity_percent - 40.0) / 50.0).clamp(0.0, 1.0);
        let rainfall = (conditions.rainfall_mm / 40.0).clamp(0.0, 0.5);

        let vector_breeding_high = conditions.temperature_c > 25.0 && conditions.humidity_percent > 70.0;

        Self {
            spread: 0.5 * temperature + 0.5 * humidity + rainfall,
            dispersion: if conditions.wind_speed_kmh > 20.0 { 0.3 } else { 0.0 },
            vector_breeding: if vector_breeding_high { 0.5 } else { 0.0 },
            exposure: (conditions.population_density / 10_000.0).clamp(0.0, 1.0)
                + (1.0 - conditions.waste_management_quality.clamp(0.0, 1.0)),
        }
    }

    pub fn score(&self) -> f64 {
        self.spread + self.dispersion + self.vector_breeding + self.exposure
    }
}

/// Estimates site factors from surveyed sensitive sites and local conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyEstimator {
    pub sites: Vec<SensitiveSite>,
    pub conditions: EnvironmentalConditions,
}

impl SurveyEstimator {
    pub fn new(sites: Vec<SensitiveSite>, conditions: EnvironmentalConditions) -> Self {
        Self { sites, conditions }
    }

    pub fn proximity_score(&self, location: &GeoPoint) -> f64 {
        let total: f64 = self.sites.iter().map(|s| s.contribution(location)).sum();
        total.min(MAX_PROXIMITY_SCORE)
    }

    pub fn environmental_score(&self) -> f64 {
        EnvironmentalModifiers::from_conditions(&self.conditions).score()
    }
}

impl SiteEstimator for SurveyEstimator {
    fn estimate(&self, location: &GeoPoint) -> SiteFactors {
        SiteFactors {
            proximity: self.proximity_score(location),
            environmental: self.environmental_score(),
            population_density: self.conditions.population_density.max(0.0),
        }
    }

    fn conditions(&self, _location: &GeoPoint) -> EnvironmentalConditions {
        self.conditions
    }
}
