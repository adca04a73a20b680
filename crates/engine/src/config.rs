use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use detection::ScorerConfig;
use hotspots::HotspotConfig;
use risk::{AggregatorConfig, FixedEstimator, SurveyEstimator};
use spatial::FieldConfig;
use water::WaterConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub field: FieldConfig,
    pub detection: ScorerConfig,
    pub water: WaterConfig,
    pub risk: AggregatorConfig,
    pub hotspots: HotspotConfig,
    pub sites: SiteModel,
    pub concurrency: ConcurrencyConfig,
    pub logging: LoggingConfig,
}

/// Where proximity and environmental factors come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SiteModel {
    Fixed(FixedEstimator),
    Survey(SurveyEstimator),
}

impl Default for SiteModel {
    fn default() -> Self {
        SiteModel::Fixed(FixedEstimator::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_concurrent_requests: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file; missing sections keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("failed to parse engine config")?;
        if config.concurrency.max_concurrent_requests == 0 {
            anyhow::bail!("concurrency.max_concurrent_requests must be at least 1");
        }
        Ok(config)
    }
}
