mod config;
mod episode;
mod processor;

use std::sync::Arc;

use crate::config::{EpisodeConfig, PathConfig, ScenarioConfig, TrafficClassConfig};
use crate::engine::EpisodeContext;
use crate::sim::{ManualClock, SimTime};

/// 单类别（1024B @ 100Mbps）、单路径（100Mbps）的最小场景
pub(crate) fn one_by_one(queue_capacity_per_thread: usize) -> ScenarioConfig {
    ScenarioConfig {
        traffic_classes: vec![TrafficClassConfig::new("TF", 1, 1024, 100.0, 10.0)],
        paths: vec![PathConfig::new("P", 1, queue_capacity_per_thread, 100.0, 1.0)],
        episode: EpisodeConfig {
            duration_seconds: 0.001,
            report_interval_seconds: 5.0,
            processor_dequeue_timeout_seconds: 0.01,
            processor_grace_seconds: 0.0,
            scale_factor: 10.0,
            seed: Some(7),
        },
    }
}

pub(crate) fn manual_ctx(
    scenario: ScenarioConfig,
    start: SimTime,
) -> (Arc<ManualClock>, Arc<EpisodeContext>) {
    let clock = Arc::new(ManualClock::new(start));
    let ctx = Arc::new(EpisodeContext::new(scenario, clock.clone()));
    (clock, ctx)
}
