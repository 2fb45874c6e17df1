//! 周期快照
//!
//! 快照是区间视图：吞吐按本区间的计数与实测区间长度计算；收入/损失是截至当前的累计值。
//! `IntervalSnapshot::compute` 是纯函数，对同一输入重复调用结果相同。

use serde::{Deserialize, Serialize};
use tracing::info;

use super::metrics::{class_revenue, round2, throughput_mbps};
use super::registry::{CumulativeCounts, IntervalCounts};
use crate::config::ScenarioConfig;
use crate::sim::SimTime;

/// 类别的区间视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassIntervalView {
    pub name: String,
    /// 生成（offered）吞吐
    pub offered_mbps: f64,
    pub dropped_mbps: f64,
    /// 按路径的准入吞吐
    pub admitted_mbps: Vec<f64>,
    /// 截至当前的平均时延
    pub mean_latency_ms: Option<f64>,
}

/// 路径上单个类别的视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathClassView {
    pub class: String,
    pub revenue: f64,
    pub loss: f64,
    pub throughput_mbps: f64,
}

/// 路径的区间视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathIntervalView {
    pub name: String,
    pub per_class: Vec<PathClassView>,
    /// 乘以收益系数后的累计收入
    pub total_revenue: f64,
    pub total_loss: f64,
    pub throughput_mbps: f64,
    pub queue_occupancy: f64,
}

/// 一次周期快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    /// 快照时刻（相对 reporter 启动）
    pub at_seconds: f64,
    pub interval_seconds: f64,
    pub classes: Vec<ClassIntervalView>,
    pub paths: Vec<PathIntervalView>,
}

/// 计算快照所需的全部输入
#[derive(Debug, Clone, Copy)]
pub struct SnapshotInputs<'a> {
    pub interval: &'a IntervalCounts,
    pub totals: &'a CumulativeCounts,
    /// 按类别的平均时延
    pub mean_latency_ms: &'a [Option<f64>],
    /// 按路径的队列占用率
    pub occupancy: &'a [f64],
    pub at: SimTime,
    pub interval_len: SimTime,
}

fn get(v: &[Vec<u64>], path: usize, class: usize) -> u64 {
    v.get(path).and_then(|row| row.get(class)).copied().unwrap_or(0)
}

impl IntervalSnapshot {
    pub fn compute(scenario: &ScenarioConfig, inputs: SnapshotInputs<'_>) -> Self {
        let scale = scenario.episode.scale_factor;
        let secs = inputs.interval_len.as_secs_f64();

        let classes = scenario
            .traffic_classes
            .iter()
            .enumerate()
            .map(|(ci, tc)| {
                let counts = inputs.interval.classes.get(ci).cloned().unwrap_or_default();
                let size = tc.packet_size_bytes;
                ClassIntervalView {
                    name: tc.name.clone(),
                    offered_mbps: throughput_mbps(scale, counts.generated, size, secs),
                    dropped_mbps: throughput_mbps(scale, counts.dropped, size, secs),
                    admitted_mbps: counts
                        .accepted
                        .iter()
                        .map(|&n| throughput_mbps(scale, n, size, secs))
                        .collect(),
                    mean_latency_ms: inputs.mean_latency_ms.get(ci).copied().flatten(),
                }
            })
            .collect();

        let paths = scenario
            .paths
            .iter()
            .enumerate()
            .map(|(pi, path)| {
                let per_class: Vec<PathClassView> = scenario
                    .traffic_classes
                    .iter()
                    .enumerate()
                    .map(|(ci, tc)| {
                        let size = tc.packet_size_bytes;
                        PathClassView {
                            class: tc.name.clone(),
                            revenue: class_revenue(
                                scale,
                                tc.unit_price,
                                size,
                                get(&inputs.totals.processed, pi, ci),
                            ),
                            loss: class_revenue(
                                scale,
                                tc.unit_price,
                                size,
                                get(&inputs.totals.loss, pi, ci),
                            ),
                            throughput_mbps: throughput_mbps(
                                scale,
                                get(&inputs.interval.processed, pi, ci),
                                size,
                                secs,
                            ),
                        }
                    })
                    .collect();
                PathIntervalView {
                    name: path.name.clone(),
                    total_revenue: per_class.iter().map(|c| c.revenue).sum::<f64>()
                        * path.revenue_factor,
                    total_loss: per_class.iter().map(|c| c.loss).sum::<f64>() * path.revenue_factor,
                    throughput_mbps: per_class.iter().map(|c| c.throughput_mbps).sum(),
                    queue_occupancy: inputs.occupancy.get(pi).copied().unwrap_or(0.0),
                    per_class,
                }
            })
            .collect();

        Self {
            at_seconds: inputs.at.as_secs_f64(),
            interval_seconds: secs,
            classes,
            paths,
        }
    }

    /// 以结构化日志输出快照
    pub fn log(&self) {
        for c in &self.classes {
            info!(
                class = %c.name,
                offered_mbps = round2(c.offered_mbps),
                dropped_mbps = round2(c.dropped_mbps),
                admitted_mbps = ?c.admitted_mbps,
                mean_latency_ms = ?c.mean_latency_ms,
                "📊 类别区间统计"
            );
        }
        for p in &self.paths {
            info!(
                path = %p.name,
                revenue = round2(p.total_revenue),
                loss = round2(p.total_loss),
                throughput_mbps = round2(p.throughput_mbps),
                queue_occupancy = round2(p.queue_occupancy),
                "📊 路径区间统计"
            );
        }
    }
}
