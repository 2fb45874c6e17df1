//! 统计注册表
//!
//! 每个 episode 新建一份，通过 `Arc` 显式传给所有 worker 与 reporter。
//! 计数器全部是原子整数（`Relaxed` 即可：不保证跨字段一致，只保证单个计数不丢更新），
//! 时延样本放在每个流量类别一个加锁的 `Vec` 中。
//!
//! 累计计数（最终报告用）从不清零；区间计数（周期快照用）由 reporter 用 `swap(0)` 取走。

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::WorkerFault;
use crate::net::{ClassId, PathId};
use crate::sim::SimTime;

fn counters(n: usize) -> Vec<AtomicU64> {
    (0..n).map(|_| AtomicU64::new(0)).collect()
}

fn bump(c: &AtomicU64) {
    c.fetch_add(1, Ordering::Relaxed);
}

fn load(c: &AtomicU64) -> u64 {
    c.load(Ordering::Relaxed)
}

fn take(c: &AtomicU64) -> u64 {
    c.swap(0, Ordering::Relaxed)
}

#[derive(Debug)]
struct ClassCounters {
    generated: AtomicU64,
    dropped: AtomicU64,
    accepted: Vec<AtomicU64>,
    interval_generated: AtomicU64,
    interval_dropped: AtomicU64,
    interval_accepted: Vec<AtomicU64>,
    anomalies: AtomicU64,
    faults: AtomicU64,
    latencies_ns: Mutex<Vec<u64>>,
}

impl ClassCounters {
    fn new(num_paths: usize) -> Self {
        Self {
            generated: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            accepted: counters(num_paths),
            interval_generated: AtomicU64::new(0),
            interval_dropped: AtomicU64::new(0),
            interval_accepted: counters(num_paths),
            anomalies: AtomicU64::new(0),
            faults: AtomicU64::new(0),
            latencies_ns: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug, Default)]
struct PathClassCounters {
    processed: AtomicU64,
    interval_processed: AtomicU64,
    loss: AtomicU64,
}

#[derive(Debug)]
struct PathCounters {
    per_class: Vec<PathClassCounters>,
    faults: AtomicU64,
}

/// 单个流量类别的生成侧计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub generated: u64,
    pub dropped: u64,
    /// 按路径的准入计数
    pub accepted: Vec<u64>,
}

/// 区间计数（自上次 `take_interval` 以来）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalCounts {
    pub classes: Vec<ClassCounts>,
    /// `processed[path][class]`
    pub processed: Vec<Vec<u64>>,
}

/// 累计计数（整个 episode）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeCounts {
    pub classes: Vec<ClassCounts>,
    /// `processed[path][class]`
    pub processed: Vec<Vec<u64>>,
    /// `loss[path][class]`
    pub loss: Vec<Vec<u64>>,
    /// 按类别统计的被丢弃的异常时延样本数
    pub anomalies: Vec<u64>,
    /// 按类别统计的 generator 故障数
    pub class_faults: Vec<u64>,
    /// 按路径统计的 processor 故障数
    pub path_faults: Vec<u64>,
}

/// 统计注册表
#[derive(Debug)]
pub struct StatsRegistry {
    classes: Vec<ClassCounters>,
    paths: Vec<PathCounters>,
}

impl StatsRegistry {
    pub fn new(num_classes: usize, num_paths: usize) -> Self {
        Self {
            classes: (0..num_classes).map(|_| ClassCounters::new(num_paths)).collect(),
            paths: (0..num_paths)
                .map(|_| PathCounters {
                    per_class: (0..num_classes).map(|_| PathClassCounters::default()).collect(),
                    faults: AtomicU64::new(0),
                })
                .collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_paths(&self) -> usize {
        self.paths.len()
    }

    fn class(&self, class: ClassId) -> Result<&ClassCounters, WorkerFault> {
        self.classes.get(class.0).ok_or(WorkerFault::UnknownClass(class))
    }

    fn path_class(&self, path: PathId, class: ClassId) -> Result<&PathClassCounters, WorkerFault> {
        self.paths
            .get(path.0)
            .ok_or(WorkerFault::UnknownPath(path))?
            .per_class
            .get(class.0)
            .ok_or(WorkerFault::UnknownClass(class))
    }

    /// generator 产生了一个 packet
    pub fn record_generated(&self, class: ClassId) -> Result<(), WorkerFault> {
        let c = self.class(class)?;
        bump(&c.generated);
        bump(&c.interval_generated);
        Ok(())
    }

    /// packet 被 `path` 的队列拒绝
    pub fn record_dropped(&self, class: ClassId, path: PathId) -> Result<(), WorkerFault> {
        let pc = self.path_class(path, class)?;
        let c = self.class(class)?;
        bump(&c.dropped);
        bump(&c.interval_dropped);
        bump(&pc.loss);
        Ok(())
    }

    /// packet 被 `path` 的队列接纳
    pub fn record_admitted(&self, class: ClassId, path: PathId) -> Result<(), WorkerFault> {
        let c = self.class(class)?;
        let (Some(total), Some(interval)) =
            (c.accepted.get(path.0), c.interval_accepted.get(path.0))
        else {
            return Err(WorkerFault::UnknownPath(path));
        };
        bump(total);
        bump(interval);
        Ok(())
    }

    /// processor 完成一个 packet，时延为 `latency`
    pub fn record_processed(
        &self,
        path: PathId,
        class: ClassId,
        latency: SimTime,
    ) -> Result<(), WorkerFault> {
        let pc = self.path_class(path, class)?;
        let c = self.class(class)?;
        c.latencies_ns.lock().push(latency.0);
        bump(&pc.processed);
        bump(&pc.interval_processed);
        Ok(())
    }

    /// 非正时延样本被丢弃
    pub fn record_anomaly(&self, class: ClassId) -> Result<(), WorkerFault> {
        bump(&self.class(class)?.anomalies);
        Ok(())
    }

    /// 类别 `class` 的 generator 出现一次故障
    pub fn record_class_fault(&self, class: ClassId) {
        if let Some(c) = self.classes.get(class.0) {
            bump(&c.faults);
        }
    }

    /// `path` 上的 processor 出现一次故障
    pub fn record_path_fault(&self, path: PathId) {
        if let Some(p) = self.paths.get(path.0) {
            bump(&p.faults);
        }
    }

    /// 读取区间计数但不清零
    pub fn peek_interval(&self) -> IntervalCounts {
        self.interval_with(load)
    }

    /// 取走区间计数（清零），供周期快照使用
    pub fn take_interval(&self) -> IntervalCounts {
        self.interval_with(take)
    }

    fn interval_with(&self, read: fn(&AtomicU64) -> u64) -> IntervalCounts {
        IntervalCounts {
            classes: self
                .classes
                .iter()
                .map(|c| ClassCounts {
                    generated: read(&c.interval_generated),
                    dropped: read(&c.interval_dropped),
                    accepted: c.interval_accepted.iter().map(read).collect(),
                })
                .collect(),
            processed: self
                .paths
                .iter()
                .map(|p| p.per_class.iter().map(|pc| read(&pc.interval_processed)).collect())
                .collect(),
        }
    }

    /// 累计计数快照
    pub fn totals(&self) -> CumulativeCounts {
        CumulativeCounts {
            classes: self
                .classes
                .iter()
                .map(|c| ClassCounts {
                    generated: load(&c.generated),
                    dropped: load(&c.dropped),
                    accepted: c.accepted.iter().map(load).collect(),
                })
                .collect(),
            processed: self
                .paths
                .iter()
                .map(|p| p.per_class.iter().map(|pc| load(&pc.processed)).collect())
                .collect(),
            loss: self
                .paths
                .iter()
                .map(|p| p.per_class.iter().map(|pc| load(&pc.loss)).collect())
                .collect(),
            anomalies: self.classes.iter().map(|c| load(&c.anomalies)).collect(),
            class_faults: self.classes.iter().map(|c| load(&c.faults)).collect(),
            path_faults: self.paths.iter().map(|p| load(&p.faults)).collect(),
        }
    }

    /// 类别 `class` 的全部时延样本（纳秒，无序）
    pub fn latency_samples(&self, class: ClassId) -> Vec<u64> {
        self.classes
            .get(class.0)
            .map(|c| c.latencies_ns.lock().clone())
            .unwrap_or_default()
    }

    /// 类别 `class` 的平均时延（毫秒）；没有样本时为 None
    pub fn mean_latency_ms(&self, class: ClassId) -> Option<f64> {
        let c = self.classes.get(class.0)?;
        let samples = c.latencies_ns.lock();
        if samples.is_empty() {
            return None;
        }
        let sum: u128 = samples.iter().map(|&ns| ns as u128).sum();
        Some(sum as f64 / samples.len() as f64 / 1e6)
    }
}
