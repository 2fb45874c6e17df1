//! 周期统计输出
//!
//! 每个间隔取走一次区间计数并输出快照；episode 时长到达时输出最后一个（可能更短的）区间后退出。

use std::sync::Arc;

use tracing::info;

use super::context::EpisodeContext;
use crate::net::ClassId;
use crate::sim::SimTime;
use crate::stats::{IntervalCounts, IntervalSnapshot, SnapshotInputs, round2};

#[derive(Debug)]
pub struct Reporter {
    ctx: Arc<EpisodeContext>,
}

impl Reporter {
    pub fn new(ctx: Arc<EpisodeContext>) -> Self {
        Self { ctx }
    }

    fn snapshot_from(&self, interval: &IntervalCounts, at: SimTime, len: SimTime) -> IntervalSnapshot {
        let ctx = &self.ctx;
        let totals = ctx.registry.totals();
        let means: Vec<Option<f64>> = ctx
            .scenario
            .class_ids()
            .map(|c: ClassId| ctx.registry.mean_latency_ms(c))
            .collect();
        let occupancy = ctx.occupancy();
        IntervalSnapshot::compute(
            &ctx.scenario,
            SnapshotInputs {
                interval,
                totals: &totals,
                mean_latency_ms: &means,
                occupancy: &occupancy,
                at,
                interval_len: len,
            },
        )
    }

    /// 不清零区间计数地计算快照
    pub fn preview(&self, at: SimTime, len: SimTime) -> IntervalSnapshot {
        let interval = self.ctx.registry.peek_interval();
        self.snapshot_from(&interval, at, len)
    }

    /// 取走区间计数并计算快照
    pub fn take_snapshot(&self, at: SimTime, len: SimTime) -> IntervalSnapshot {
        let interval = self.ctx.registry.take_interval();
        self.snapshot_from(&interval, at, len)
    }

    /// 运行到 episode 时长结束，返回全部快照
    #[tracing::instrument(name = "reporter", skip(self))]
    pub fn run(self) -> Vec<IntervalSnapshot> {
        let clock = Arc::clone(&self.ctx.clock);
        let duration = self.ctx.scenario.episode.duration();
        let interval = self.ctx.scenario.episode.report_interval();
        let start = self.ctx.started;
        let mut last = start;
        let mut snapshots = Vec::new();

        loop {
            let elapsed = clock.now().saturating_sub(start);
            if elapsed >= duration {
                break;
            }
            clock.sleep(interval.min(duration.saturating_sub(elapsed)));

            let now = clock.now();
            let snap = self.take_snapshot(now.saturating_sub(start), now.saturating_sub(last));
            last = now;
            snap.log();
            info!(
                at_seconds = round2(snap.at_seconds),
                queues = ?snap.paths.iter().map(|p| p.queue_occupancy).collect::<Vec<_>>(),
                "队列占用率"
            );
            snapshots.push(snap);
        }

        info!(snapshots = snapshots.len(), "停止统计输出");
        snapshots
    }
}
