//! 时钟
//!
//! `MonotonicClock` 基于 `Instant`，用于真实节拍的仿真；
//! `ManualClock` 只在调用 `sleep`/`idle`/`advance` 时前进，用于确定性测试。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::time::SimTime;

/// 时间源：提供当前时间，并按该时间源的语义“睡眠”。
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// 自时钟原点起经过的时间
    fn now(&self) -> SimTime;
    /// 挂起当前 worker `d` 时长
    fn sleep(&self, d: SimTime);
    /// worker 已经在外部（如带超时出队）真实等待了 `d`；真实时钟无需处理
    fn idle(&self, _d: SimTime) {}
}

/// 单调时钟（原点为构造时刻）。
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> SimTime {
        SimTime::from(self.origin.elapsed())
    }

    fn sleep(&self, d: SimTime) {
        if d > SimTime::ZERO {
            std::thread::sleep(d.to_duration());
        }
    }
}

/// 手动时钟：`sleep` 不阻塞，只把时间向前推。
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ns: AtomicU64,
}

impl ManualClock {
    pub fn new(start: SimTime) -> Self {
        Self {
            now_ns: AtomicU64::new(start.0),
        }
    }

    pub fn advance(&self, d: SimTime) {
        self.now_ns.fetch_add(d.0, Ordering::SeqCst);
    }

    pub fn set(&self, t: SimTime) {
        self.now_ns.store(t.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SimTime {
        SimTime(self.now_ns.load(Ordering::SeqCst))
    }

    fn sleep(&self, d: SimTime) {
        self.advance(d);
    }

    /// 空闲等待同样推进时间，否则空闲的 processor 永远等不到截止时间
    fn idle(&self, d: SimTime) {
        self.advance(d);
    }
}
