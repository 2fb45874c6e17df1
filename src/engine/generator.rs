//! 流量生成 worker
//!
//! 每个 worker 按 `packet_size * 8 / rate` 的间隔发包，按路由策略加权选路，
//! 非阻塞入队；队列满则记为丢包。每个 worker 自行检查 episode 已运行时间，到达时长后独立退出。

use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use super::context::EpisodeContext;
use crate::error::WorkerFault;
use crate::net::{ClassId, Packet, PathChooser, PathId};

/// 一次准入尝试的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted(PathId),
    Dropped(PathId),
}

#[derive(Debug)]
pub struct GeneratorWorker {
    ctx: Arc<EpisodeContext>,
    class: ClassId,
    index: usize,
    chooser: PathChooser,
    rng: StdRng,
}

impl GeneratorWorker {
    pub fn new(
        ctx: Arc<EpisodeContext>,
        class: ClassId,
        index: usize,
        chooser: PathChooser,
        rng: StdRng,
    ) -> Self {
        Self {
            ctx,
            class,
            index,
            chooser,
            rng,
        }
    }

    /// 生成一个 packet、选路并尝试入队
    pub fn step(&mut self) -> Result<Admission, WorkerFault> {
        let ctx = &self.ctx;
        let path = self.chooser.choose(&mut self.rng);
        let queue = ctx.queue(path).ok_or(WorkerFault::UnknownPath(path))?;

        ctx.registry.record_generated(self.class)?;
        let pkt = Packet::new(ctx.clock.now(), self.class);
        match queue.try_enqueue(pkt) {
            Ok(()) => {
                ctx.registry.record_admitted(self.class, path)?;
                trace!(class = self.class.0, path = path.0, "packet 入队");
                Ok(Admission::Accepted(path))
            }
            Err(_) => {
                ctx.registry.record_dropped(self.class, path)?;
                trace!(class = self.class.0, path = path.0, "队列已满，丢包");
                Ok(Admission::Dropped(path))
            }
        }
    }

    /// 在 `[0, duration)` 内按间隔发包，最迟在 duration 处返回；返回尝试发送的 packet 数
    #[tracing::instrument(name = "generator", skip(self), fields(class = self.class.0, worker = self.index))]
    pub fn run(mut self) -> u64 {
        let ctx = Arc::clone(&self.ctx);
        let Some(cfg) = ctx.scenario.class(self.class) else {
            warn!("未知流量类别，generator 退出");
            ctx.registry.record_class_fault(self.class);
            return 0;
        };
        let gap = cfg.inter_arrival();
        let duration = ctx.scenario.episode.duration();
        let start = ctx.started;
        info!(name = %cfg.name, gap = ?gap, "generator 启动");

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            if let Err(fault) = self.step() {
                warn!(%fault, "generator 迭代失败，继续运行");
                ctx.registry.record_class_fault(self.class);
            }
            let Some(gap) = gap else {
                debug!("目标速率为 0，只发送一个 packet");
                break;
            };
            // 下一个 packet 落在时长之外时，只睡到时长结束
            let remaining = duration.saturating_sub(ctx.clock.now().saturating_sub(start));
            if gap >= remaining {
                ctx.clock.sleep(remaining);
                break;
            }
            ctx.clock.sleep(gap);
        }

        info!(name = %cfg.name, attempts, "generator 结束");
        attempts
    }
}
