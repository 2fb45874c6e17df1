//! 最终报告
//!
//! 报告是整个 episode 的累计视图，在所有 worker 退出（静止点）之后由注册表组装。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::{class_revenue, percentile_ns, ratio, throughput_mbps};
use super::registry::StatsRegistry;
use super::snapshot::IntervalSnapshot;
use crate::config::ScenarioConfig;
use crate::sim::SimTime;

/// 流量类别报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub name: String,
    pub generated: u64,
    pub dropped: u64,
    pub drop_ratio: f64,
    /// 按路径的准入计数
    pub accepted: Vec<u64>,
    /// 按路径的完成计数
    pub processed: Vec<u64>,
    pub mean_latency_ms: Option<f64>,
    pub p50_latency_ms: Option<f64>,
    pub p99_latency_ms: Option<f64>,
    /// 因时延非正而被丢弃的样本数
    pub discarded_latency_samples: u64,
    pub faults: u64,
}

/// 路径上单个类别的经济结果（未乘收益系数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathClassReport {
    pub class: String,
    pub processed: u64,
    pub loss_count: u64,
    pub revenue: f64,
    pub loss: f64,
}

/// 路径报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathReport {
    pub name: String,
    pub processed: u64,
    pub loss_count: u64,
    pub per_class: Vec<PathClassReport>,
    /// 乘以收益系数后的总收入
    pub total_revenue: f64,
    pub total_loss: f64,
    /// 整个 episode 的平均吞吐
    pub throughput_mbps: f64,
    pub queue_occupancy: f64,
    pub faults: u64,
}

/// episode 报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub elapsed_seconds: f64,
    pub classes: Vec<ClassReport>,
    pub paths: Vec<PathReport>,
    #[serde(default)]
    pub snapshots: Vec<IntervalSnapshot>,
}

/// 守恒不变量被破坏：generated != dropped + Σ accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "class {class:?}: generated {generated} != dropped {dropped} + accepted {accepted}"
)]
pub struct ConservationViolation {
    pub class: String,
    pub generated: u64,
    pub dropped: u64,
    pub accepted: u64,
}

fn ns_to_ms(ns: u64) -> f64 {
    SimTime(ns).as_millis_f64()
}

impl Report {
    /// 从注册表的当前（应为静止）状态组装报告
    pub fn build(
        scenario: &ScenarioConfig,
        registry: &StatsRegistry,
        occupancy: &[f64],
        elapsed: SimTime,
        snapshots: Vec<IntervalSnapshot>,
    ) -> Self {
        let totals = registry.totals();
        let scale = scenario.episode.scale_factor;
        let secs = elapsed.as_secs_f64();

        let classes = scenario
            .class_ids()
            .zip(&scenario.traffic_classes)
            .map(|(id, tc)| {
                let counts = totals.classes.get(id.0).cloned().unwrap_or_default();
                let samples = registry.latency_samples(id);
                ClassReport {
                    name: tc.name.clone(),
                    generated: counts.generated,
                    dropped: counts.dropped,
                    drop_ratio: ratio(counts.dropped, counts.generated),
                    processed: totals
                        .processed
                        .iter()
                        .map(|row| row.get(id.0).copied().unwrap_or(0))
                        .collect(),
                    accepted: counts.accepted,
                    mean_latency_ms: registry.mean_latency_ms(id),
                    p50_latency_ms: percentile_ns(&samples, 0.50).map(ns_to_ms),
                    p99_latency_ms: percentile_ns(&samples, 0.99).map(ns_to_ms),
                    discarded_latency_samples: totals.anomalies.get(id.0).copied().unwrap_or(0),
                    faults: totals.class_faults.get(id.0).copied().unwrap_or(0),
                }
            })
            .collect();

        let paths = scenario
            .path_ids()
            .zip(&scenario.paths)
            .map(|(pid, path)| {
                let processed_row = totals.processed.get(pid.0).cloned().unwrap_or_default();
                let loss_row = totals.loss.get(pid.0).cloned().unwrap_or_default();
                let mut throughput = 0.0;
                let per_class: Vec<PathClassReport> = scenario
                    .traffic_classes
                    .iter()
                    .enumerate()
                    .map(|(ci, tc)| {
                        let processed = processed_row.get(ci).copied().unwrap_or(0);
                        let loss_count = loss_row.get(ci).copied().unwrap_or(0);
                        throughput += throughput_mbps(scale, processed, tc.packet_size_bytes, secs);
                        PathClassReport {
                            class: tc.name.clone(),
                            processed,
                            loss_count,
                            revenue: class_revenue(
                                scale,
                                tc.unit_price,
                                tc.packet_size_bytes,
                                processed,
                            ),
                            loss: class_revenue(scale, tc.unit_price, tc.packet_size_bytes, loss_count),
                        }
                    })
                    .collect();
                PathReport {
                    name: path.name.clone(),
                    processed: per_class.iter().map(|c| c.processed).sum(),
                    loss_count: per_class.iter().map(|c| c.loss_count).sum(),
                    total_revenue: per_class.iter().map(|c| c.revenue).sum::<f64>()
                        * path.revenue_factor,
                    total_loss: per_class.iter().map(|c| c.loss).sum::<f64>() * path.revenue_factor,
                    throughput_mbps: throughput,
                    queue_occupancy: occupancy.get(pid.0).copied().unwrap_or(0.0),
                    faults: totals.path_faults.get(pid.0).copied().unwrap_or(0),
                    per_class,
                }
            })
            .collect();

        Self {
            elapsed_seconds: secs,
            classes,
            paths,
            snapshots,
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn path(&self, name: &str) -> Option<&PathReport> {
        self.paths.iter().find(|p| p.name == name)
    }

    /// 检查每个类别的守恒关系：generated == dropped + Σ_path accepted[path]
    pub fn check_conservation(&self) -> Result<(), ConservationViolation> {
        for c in &self.classes {
            let accepted: u64 = c.accepted.iter().sum();
            if c.generated != c.dropped + accepted {
                return Err(ConservationViolation {
                    class: c.name.clone(),
                    generated: c.generated,
                    dropped: c.dropped,
                    accepted,
                });
            }
        }
        Ok(())
    }
}
