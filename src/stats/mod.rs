//! 统计模块
//!
//! 并发计数注册表、派生指标、周期快照与最终报告。

mod metrics;
mod registry;
mod report;
mod snapshot;

pub use metrics::{class_revenue, percentile_ns, ratio, round2, throughput_mbps};
pub use registry::{ClassCounts, CumulativeCounts, IntervalCounts, StatsRegistry};
pub use report::{ClassReport, ConservationViolation, PathClassReport, PathReport, Report};
pub use snapshot::{
    ClassIntervalView, IntervalSnapshot, PathClassView, PathIntervalView, SnapshotInputs,
};
