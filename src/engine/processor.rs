//! 处理 worker
//!
//! 从路径队列带超时出队；按 `packet_size * 8 / service_rate` 模拟服务耗时，
//! 然后以同一单调时钟计算时延。超时只用于重新检查终止条件。

use std::sync::Arc;

use tracing::{info, trace, warn};

use super::context::EpisodeContext;
use crate::error::WorkerFault;
use crate::net::{ClassId, Packet, PathId};
use crate::queue::Dequeue;
use crate::sim::SimTime;

/// 一次服务的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Completed { class: ClassId, latency: SimTime },
    /// 时延非正，样本被丢弃
    Discarded { class: ClassId },
}

#[derive(Debug)]
pub struct ProcessorWorker {
    ctx: Arc<EpisodeContext>,
    path: PathId,
    index: usize,
}

impl ProcessorWorker {
    pub fn new(ctx: Arc<EpisodeContext>, path: PathId, index: usize) -> Self {
        Self { ctx, path, index }
    }

    /// 服务一个 packet 并更新统计
    pub fn serve(&self, pkt: Packet) -> Result<Service, WorkerFault> {
        let ctx = &self.ctx;
        let class = pkt.class();
        let tc = ctx
            .scenario
            .class(class)
            .ok_or(WorkerFault::UnknownClass(class))?;
        let path_cfg = ctx
            .scenario
            .path(self.path)
            .ok_or(WorkerFault::UnknownPath(self.path))?;

        ctx.clock.sleep(path_cfg.service_time(tc.packet_size_bytes));
        let now = ctx.clock.now();
        match now.checked_since(pkt.created_at()) {
            Some(latency) => {
                ctx.registry.record_processed(self.path, class, latency)?;
                trace!(class = class.0, latency_ns = latency.0, "packet 处理完成");
                Ok(Service::Completed { class, latency })
            }
            None => {
                warn!(
                    class = class.0,
                    created_at = pkt.created_at().0,
                    now = now.0,
                    "时延非正，丢弃样本"
                );
                ctx.registry.record_anomaly(class)?;
                Ok(Service::Discarded { class })
            }
        }
    }

    /// 运行到队列空闲且 episode 已运行超过 duration + grace；返回处理的 packet 数
    #[tracing::instrument(name = "processor", skip(self), fields(path = self.path.0, worker = self.index))]
    pub fn run(self) -> u64 {
        let ctx = Arc::clone(&self.ctx);
        let Some(queue) = ctx.queue(self.path) else {
            warn!("未知路径，processor 退出");
            ctx.registry.record_path_fault(self.path);
            return 0;
        };
        let idle = ctx.scenario.episode.dequeue_timeout();
        let timeout = idle.to_duration();
        let deadline = ctx.scenario.episode.processor_deadline();
        let start = ctx.started;
        info!(capacity = queue.capacity(), "processor 启动");

        let mut served = 0u64;
        loop {
            match queue.dequeue(timeout) {
                Dequeue::TimedOut => {
                    ctx.clock.idle(idle);
                    if ctx.clock.now().saturating_sub(start) > deadline {
                        break;
                    }
                }
                Dequeue::Packet(pkt) => match self.serve(pkt) {
                    Ok(_) => served += 1,
                    Err(fault) => {
                        warn!(%fault, "processor 迭代失败，继续运行");
                        ctx.registry.record_path_fault(self.path);
                    }
                },
            }
        }

        info!(served, "processor 结束");
        served
    }
}
