use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use detection::{DetectionSummary, EnvironmentalImpact, RawDetection};
use hotspots::{HotspotRecord, WaterZone};
use risk::{CleanupConditions, EnvironmentalConditions, RiskAssessment};
use spatial::{GeoBounds, GeoPoint, HeatmapPoint};
use water::{ContaminationReading, ParameterReading, WaterQualityResult};

use crate::config::ConcurrencyConfig;
use crate::metrics::{Metrics, Operation, TimedOperation};
use crate::Engine;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSample {
    pub contamination: Vec<ContaminationReading>,
    pub parameters: Vec<ParameterReading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    ScoreDetections {
        detections: Vec<RawDetection>,
    },
    ScoreWater {
        #[serde(flatten)]
        sample: WaterSample,
    },
    /// Raw detections and water sample are scored before combining
    AssessRisk {
        location: GeoPoint,
        #[serde(default)]
        detections: Option<Vec<RawDetection>>,
        #[serde(default)]
        water: Option<WaterSample>,
    },
    GenerateHotspots {
        bounds: GeoBounds,
        zoom_level: u8,
        #[serde(default)]
        limit: Option<usize>,
    },
    Heatmap {
        bounds: GeoBounds,
        zoom_level: u8,
    },
    WaterZones {
        bounds: GeoBounds,
        zoom_level: u8,
    },
    /// Without observed conditions the site model's are used
    CleanupConditions {
        location: GeoPoint,
        #[serde(default)]
        conditions: Option<EnvironmentalConditions>,
    },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::ScoreDetections { .. } => Operation::ScoreDetections,
            Request::ScoreWater { .. } => Operation::ScoreWater,
            Request::AssessRisk { .. } => Operation::AssessRisk,
            Request::GenerateHotspots { .. } => Operation::GenerateHotspots,
            Request::Heatmap { .. } => Operation::Heatmap,
            Request::WaterZones { .. } => Operation::WaterZones,
            Request::CleanupConditions { .. } => Operation::CleanupConditions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Response {
    ScoreDetections {
        summary: DetectionSummary,
        impact: Option<EnvironmentalImpact>,
    },
    ScoreWater {
        result: WaterQualityResult,
    },
    AssessRisk {
        assessment: RiskAssessment,
    },
    GenerateHotspots {
        hotspots: Vec<HotspotRecord>,
    },
    Heatmap {
        points: Vec<HeatmapPoint>,
    },
    WaterZones {
        zones: Vec<WaterZone>,
    },
    CleanupConditions {
        conditions: CleanupConditions,
    },
    Error {
        message: String,
    },
}

impl Response {
    fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// Run one request against the engine, recording metrics
pub fn execute(engine: &Engine, metrics: &Metrics, request: Request) -> Response {
    let operation = request.operation();
    let timer = TimedOperation::start();

    let response = match request {
        Request::ScoreDetections { detections } => {
            let summary = engine.score_detections(&detections);
            let impact = engine.environmental_impact(&summary);
            Response::ScoreDetections { summary, impact }
        }
        Request::ScoreWater { sample } => Response::ScoreWater {
            result: engine.score_water(&sample.contamination, &sample.parameters),
        },
        Request::AssessRisk {
            location,
            detections,
            water,
        } => {
            let summary = detections.map(|d| engine.score_detections(&d));
            let water = water.map(|w| engine.score_water(&w.contamination, &w.parameters));
            let assessment = engine.assess_risk(location, summary.as_ref(), water.as_ref());
            if !assessment.success {
                metrics.record_soft_failure();
            }
            Response::AssessRisk { assessment }
        }
        Request::GenerateHotspots {
            bounds,
            zoom_level,
            limit,
        } => {
            let result = match limit {
                Some(limit) => engine.top_hotspots(&bounds, zoom_level, limit),
                None => engine.generate_hotspots(&bounds, zoom_level),
            };
            match result {
                Ok(hotspots) => Response::GenerateHotspots { hotspots },
                Err(e) => Response::error(e.to_string()),
            }
        }
        Request::Heatmap { bounds, zoom_level } => match engine.heatmap(&bounds, zoom_level) {
            Ok(points) => Response::Heatmap { points },
            Err(e) => Response::error(e.to_string()),
        },
        Request::WaterZones { bounds, zoom_level } => match engine.water_zones(&bounds, zoom_level) {
            Ok(zones) => Response::WaterZones { zones },
            Err(e) => Response::error(e.to_string()),
        },
        Request::CleanupConditions { location, conditions } => Response::CleanupConditions {
            conditions: engine.cleanup_conditions(location, conditions.as_ref()),
        },
    };

    metrics.record_operation(operation, timer.elapsed());
    metrics.record_request(!response.is_error());
    response
}

/// Decode and run one JSON request; malformed input becomes an error response
pub fn execute_value(engine: &Engine, metrics: &Metrics, value: serde_json::Value) -> Response {
    match serde_json::from_value::<Request>(value) {
        Ok(request) => execute(engine, metrics, request),
        Err(e) => {
            metrics.record_request(false);
            Response::error(format!("invalid request: {}", e))
        }
    }
}

/// Runs a batch of requests concurrently, preserving input order in the output
pub struct BatchRunner {
    engine: Arc<Engine>,
    metrics: Arc<Metrics>,
    semaphore: Arc<Semaphore>,
}

impl BatchRunner {
    pub fn new(engine: Arc<Engine>, metrics: Arc<Metrics>, concurrency: &ConcurrencyConfig) -> Self {
        Self {
            engine,
            metrics,
            semaphore: Arc::new(Semaphore::new(concurrency.max_concurrent_requests.max(1))),
        }
    }

    pub async fn run(&self, requests: Vec<serde_json::Value>) -> Result<Vec<Response>> {
        let total = requests.len();
        info!(requests = total, "Starting batch");

        let mut handles = Vec::with_capacity(total);
        for value in requests {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .context("batch semaphore closed")?;
            let engine = self.engine.clone();
            let metrics = self.metrics.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                execute_value(&engine, &metrics, value)
            }));
        }

        let mut responses = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            let response = match handle.await {
                Ok(response) => response,
                Err(e) => {
                    error!(index, error = %e, "Batch entry aborted");
                    self.metrics.record_request(false);
                    Response::error(format!("request {} aborted: {}", index, e))
                }
            };
            responses.push(response);
        }

        let errors = responses.iter().filter(|r| r.is_error()).count();
        if errors > 0 {
            warn!(errors, total, "Batch finished with rejected requests");
        }
        info!(requests = total, errors, "Batch complete");

        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use risk::{CleanupWindow, SiteEstimator, SiteFactors};
    use serde_json::json;

    fn runner(max_concurrent_requests: usize) -> (BatchRunner, Arc<Metrics>) {
        let metrics = Metrics::new();
        let engine = Arc::new(Engine::new(&EngineConfig::default()));
        let concurrency = ConcurrencyConfig {
            max_concurrent_requests,
        };
        (BatchRunner::new(engine, metrics.clone(), &concurrency), metrics)
    }

    #[test]
    fn test_request_parsing() {
        let request: Request = serde_json::from_value(json!({
            "operation": "score_water",
            "contamination": [{"contaminant": "oil_spill", "coverage_percent": 10.0, "severity": 0.9}]
        }))
        .unwrap();

        match request {
            Request::ScoreWater { sample } => {
                assert_eq!(sample.contamination.len(), 1);
                assert!(sample.parameters.is_empty());
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let (runner, metrics) = runner(2);
        let requests = vec![
            json!({"operation": "heatmap", "bounds": {"lat_min": 28.6, "lat_max": 28.62, "lng_min": 77.2, "lng_max": 77.22}, "zoom_level": 12}),
            json!({"operation": "score_detections", "detections": [
                {"type": "plastic_bottle", "bounding_box": {"x1": 0.0, "y1": 0.0, "x2": 50.0, "y2": 100.0}}
            ]}),
            json!({"operation": "assess_risk", "location": {"lat": 28.6, "lng": 77.2}}),
            json!({"operation": "generate_hotspots", "bounds": {"lat_min": 20.0, "lat_max": 20.1, "lng_min": 85.0, "lng_max": 85.1}, "zoom_level": 14, "limit": 3}),
        ];

        let responses = runner.run(requests).await.unwrap();
        assert_eq!(responses.len(), 4);
        assert!(matches!(responses[0], Response::Heatmap { .. }));
        match &responses[1] {
            Response::ScoreDetections { summary, impact } => {
                assert_eq!(summary.total_items, 1);
                assert!(impact.is_some());
            }
            other => panic!("unexpected response {:?}", other),
        }
        match &responses[2] {
            Response::AssessRisk { assessment } => {
                // floors 0.1 + 0.05, fixed estimator 1.0 + 0.5
                assert!((assessment.combined_score - 1.65).abs() < 1e-9);
            }
            other => panic!("unexpected response {:?}", other),
        }
        match &responses[3] {
            Response::GenerateHotspots { hotspots } => assert_eq!(hotspots.len(), 3),
            other => panic!("unexpected response {:?}", other),
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 4);
        assert_eq!(snapshot.successful_requests, 4);
        assert_eq!(snapshot.operations["heatmap"].calls, 1);
    }

    #[tokio::test]
    async fn test_rejected_inputs_do_not_abort_batch() {
        let (runner, metrics) = runner(4);
        let requests = vec![
            json!({"operation": "generate_hotspots", "bounds": {"lat_min": 20.1, "lat_max": 20.0, "lng_min": 85.0, "lng_max": 85.1}, "zoom_level": 14}),
            json!({"operation": "teleport"}),
            json!({"operation": "score_water"}),
        ];

        let responses = runner.run(requests).await.unwrap();
        assert!(responses[0].is_error());
        assert!(responses[1].is_error());
        assert!(matches!(responses[2], Response::ScoreWater { .. }));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rejected_requests, 2);
        assert_eq!(snapshot.successful_requests, 1);
    }

    struct BrokenEstimator;

    impl SiteEstimator for BrokenEstimator {
        fn estimate(&self, _location: &GeoPoint) -> SiteFactors {
            panic!("site survey unavailable");
        }
    }

    #[tokio::test]
    async fn test_panicking_entry_keeps_other_results() {
        let metrics = Metrics::new();
        let engine = Arc::new(Engine::new(&EngineConfig::default()).with_estimator(Arc::new(BrokenEstimator)));
        let runner = BatchRunner::new(engine, metrics.clone(), &ConcurrencyConfig::default());

        let requests = vec![
            json!({"operation": "score_water"}),
            json!({"operation": "assess_risk", "location": {"lat": 28.6, "lng": 77.2}}),
            json!({"operation": "heatmap", "bounds": {"lat_min": 28.6, "lat_max": 28.62, "lng_min": 77.2, "lng_max": 77.22}, "zoom_level": 12}),
        ];

        let responses = runner.run(requests).await.unwrap();
        assert_eq!(responses.len(), 3);
        assert!(matches!(responses[0], Response::ScoreWater { .. }));
        match &responses[1] {
            Response::Error { message } => assert!(message.starts_with("request 1 aborted")),
            other => panic!("unexpected response {:?}", other),
        }
        assert!(matches!(responses[2], Response::Heatmap { .. }));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.rejected_requests, 1);
    }

    #[tokio::test]
    async fn test_water_zone_and_cleanup_requests() {
        let (runner, metrics) = runner(2);
        let requests = vec![
            json!({"operation": "water_zones", "bounds": {"lat_min": 20.0, "lat_max": 20.5, "lng_min": 85.0, "lng_max": 85.5}, "zoom_level": 12}),
            json!({"operation": "cleanup_conditions", "location": {"lat": 20.1, "lng": 85.1},
                   "conditions": {"temperature_c": 36.0, "rainfall_mm": 0.0}}),
            json!({"operation": "water_zones", "bounds": {"lat_min": -1e308, "lat_max": 1e308, "lng_min": 0.0, "lng_max": 1.0}, "zoom_level": 10}),
        ];

        let responses = runner.run(requests).await.unwrap();
        match &responses[0] {
            // 0.25 sq deg * 50 * 1.2
            Response::WaterZones { zones } => assert_eq!(zones.len(), 15),
            other => panic!("unexpected response {:?}", other),
        }
        match &responses[1] {
            Response::CleanupConditions { conditions } => {
                assert_eq!(conditions.recommended_time, CleanupWindow::Evening);
                assert!(conditions.equipment.contains(&"Cooling vests".to_string()));
            }
            other => panic!("unexpected response {:?}", other),
        }
        match &responses[2] {
            Response::Error { message } => assert!(message.contains("invalid bounds")),
            other => panic!("unexpected response {:?}", other),
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.operations["water_zones"].calls, 2);
        assert_eq!(snapshot.operations["cleanup_conditions"].calls, 1);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = Response::error("invalid bounds: lat_min (20.1) must be below lat_max (20)");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["operation"], "error");
        assert!(value["message"].as_str().unwrap().starts_with("invalid bounds"));
    }
}
