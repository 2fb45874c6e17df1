//! episode 共享状态
//!
//! 每次 `run_episode` 新建一份，通过 `Arc` 传给所有 worker；episode 之间不共享任何状态。

use std::sync::Arc;

use crate::config::ScenarioConfig;
use crate::net::PathId;
use crate::queue::PathQueue;
use crate::sim::{Clock, SimTime};
use crate::stats::StatsRegistry;

#[derive(Debug)]
pub struct EpisodeContext {
    pub scenario: ScenarioConfig,
    pub queues: Vec<PathQueue>,
    pub registry: StatsRegistry,
    pub clock: Arc<dyn Clock>,
    /// episode 起点；所有 worker 的终止判断都相对于它
    pub started: SimTime,
}

impl EpisodeContext {
    /// 按场景配置创建队列与注册表（不做校验），以时钟当前时刻为 episode 起点
    pub fn new(scenario: ScenarioConfig, clock: Arc<dyn Clock>) -> Self {
        let queues = scenario
            .paths
            .iter()
            .map(|p| PathQueue::new(p.queue_capacity()))
            .collect();
        let registry = StatsRegistry::new(scenario.traffic_classes.len(), scenario.paths.len());
        let started = clock.now();
        Self {
            scenario,
            queues,
            registry,
            clock,
            started,
        }
    }

    pub fn queue(&self, path: PathId) -> Option<&PathQueue> {
        self.queues.get(path.0)
    }

    /// 按路径的队列占用率
    pub fn occupancy(&self) -> Vec<f64> {
        self.queues.iter().map(PathQueue::occupancy).collect()
    }
}
