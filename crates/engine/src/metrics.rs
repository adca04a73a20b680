use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const OPERATION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ScoreDetections,
    ScoreWater,
    AssessRisk,
    GenerateHotspots,
    Heatmap,
    WaterZones,
    CleanupConditions,
}

impl Operation {
    const ALL: [Operation; OPERATION_COUNT] = [
        Operation::ScoreDetections,
        Operation::ScoreWater,
        Operation::AssessRisk,
        Operation::GenerateHotspots,
        Operation::Heatmap,
        Operation::WaterZones,
        Operation::CleanupConditions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ScoreDetections => "score_detections",
            Operation::ScoreWater => "score_water",
            Operation::AssessRisk => "assess_risk",
            Operation::GenerateHotspots => "generate_hotspots",
            Operation::Heatmap => "heatmap",
            Operation::WaterZones => "water_zones",
            Operation::CleanupConditions => "cleanup_conditions",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Default)]
struct OperationCounters {
    calls: AtomicUsize,
    total_time_us: AtomicU64,
}

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    rejected_requests: AtomicUsize,
    soft_failures: AtomicUsize,

    // Per-operation timing (in microseconds)
    operations: [OperationCounters; OPERATION_COUNT],
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            rejected_requests: AtomicUsize::new(0),
            soft_failures: AtomicUsize::new(0),
            operations: Default::default(),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A request that completed but produced an unsuccessful result
    pub fn record_soft_failure(&self) {
        self.soft_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_operation(&self, operation: Operation, duration: Duration) {
        let counters = &self.operations[operation.index()];
        counters.calls.fetch_add(1, Ordering::Relaxed);
        counters
            .total_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let operations = Operation::ALL
            .iter()
            .map(|op| {
                let counters = &self.operations[op.index()];
                let calls = counters.calls.load(Ordering::Relaxed);
                let total_us = counters.total_time_us.load(Ordering::Relaxed) as f64;
                let avg_time_ms = if calls > 0 {
                    total_us / calls as f64 / 1000.0 // Convert to ms
                } else {
                    0.0
                };
                (op.as_str().to_string(), OperationSnapshot { calls, avg_time_ms })
            })
            .collect();

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            soft_failures: self.soft_failures.load(Ordering::Relaxed),
            operations,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationSnapshot {
    pub calls: usize,
    pub avg_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub rejected_requests: usize,
    pub soft_failures: usize,
    pub operations: BTreeMap<String, OperationSnapshot>,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
