//! episode 运行器
//!
//! 校验配置，创建本 episode 的队列与注册表，启动 processor、generator 与 reporter 线程，
//! 等待全部 worker 自行退出后汇总报告。

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use super::context::EpisodeContext;
use super::generator::GeneratorWorker;
use super::processor::ProcessorWorker;
use super::reporter::Reporter;
use crate::config::ScenarioConfig;
use crate::error::EpisodeError;
use crate::net::{ClassId, PathChooser, PathId, RoutingPolicy};
use crate::sim::{Clock, MonotonicClock};
use crate::stats::{Report, round2};

fn spawn<T, F>(name: String, f: F) -> Result<JoinHandle<T>, EpisodeError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| EpisodeError::Spawn { role: name, source })
}

/// 以单调时钟运行一个 episode
pub fn run_episode(
    policy: &RoutingPolicy,
    scenario: &ScenarioConfig,
) -> Result<Report, EpisodeError> {
    run_episode_with_clock(policy, scenario, Arc::new(MonotonicClock::new()))
}

/// 以给定时钟运行一个 episode，阻塞到所有 worker 退出
#[tracing::instrument(skip_all, fields(policy = ?policy.as_slice()))]
pub fn run_episode_with_clock(
    policy: &RoutingPolicy,
    scenario: &ScenarioConfig,
    clock: Arc<dyn Clock>,
) -> Result<Report, EpisodeError> {
    scenario.validate()?;
    policy.validate(scenario.traffic_classes.len(), scenario.paths.len())?;
    let choosers = scenario
        .class_ids()
        .map(|c| PathChooser::from_policy(policy, c, scenario.paths.len()))
        .collect::<Result<Vec<_>, _>>()?;

    let ctx = Arc::new(EpisodeContext::new(scenario.clone(), clock));
    info!(
        classes = scenario.traffic_classes.len(),
        paths = scenario.paths.len(),
        duration_s = scenario.episode.duration_seconds,
        "▶️  episode 开始"
    );

    // 若中途 spawn 失败，已启动的 worker 会按时长自行退出
    let mut processors: Vec<(PathId, JoinHandle<u64>)> = Vec::new();
    for (path, cfg) in scenario.path_ids().zip(&scenario.paths) {
        for i in 0..cfg.num_processor_threads {
            let worker = ProcessorWorker::new(Arc::clone(&ctx), path, i);
            let handle = spawn(format!("proc-{}-{i}", cfg.name), move || worker.run())?;
            processors.push((path, handle));
        }
    }

    let mut generators: Vec<(ClassId, JoinHandle<u64>)> = Vec::new();
    let mut worker_seq = 0u64;
    for ((class, cfg), chooser) in scenario
        .class_ids()
        .zip(&scenario.traffic_classes)
        .zip(&choosers)
    {
        for i in 0..cfg.num_generator_threads {
            let rng = match scenario.episode.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker_seq)),
                None => StdRng::from_entropy(),
            };
            worker_seq += 1;
            let worker = GeneratorWorker::new(Arc::clone(&ctx), class, i, chooser.clone(), rng);
            let handle = spawn(format!("gen-{}-{i}", cfg.name), move || worker.run())?;
            generators.push((class, handle));
        }
    }

    let reporter = Reporter::new(Arc::clone(&ctx));
    let reporter = spawn("reporter".to_string(), move || reporter.run())?;

    for (class, handle) in generators {
        if handle.join().is_err() {
            error!(class = class.0, "generator 线程 panic");
            ctx.registry.record_class_fault(class);
        }
    }
    for (path, handle) in processors {
        if handle.join().is_err() {
            error!(path = path.0, "processor 线程 panic");
            ctx.registry.record_path_fault(path);
        }
    }
    let snapshots = reporter.join().unwrap_or_else(|_| {
        error!("reporter 线程 panic");
        Vec::new()
    });

    let elapsed = ctx.clock.now().saturating_sub(ctx.started);
    let report = Report::build(
        &ctx.scenario,
        &ctx.registry,
        &ctx.occupancy(),
        elapsed,
        snapshots,
    );
    if let Err(violation) = report.check_conservation() {
        warn!(%violation, "episode 结束时守恒关系不成立");
    }

    info!(
        elapsed_s = round2(report.elapsed_seconds),
        queues = ?report.paths.iter().map(|p| p.queue_occupancy).collect::<Vec<_>>(),
        "✅ episode 完成"
    );
    Ok(report)
}
