//! 错误类型
//!
//! 只有配置校验失败会中止一个 episode；丢包与异常时延作为统计数据记录，
//! worker 单次迭代内的故障记录日志后继续运行。

use thiserror::Error;

use crate::net::{ClassId, PathId};

/// 配置校验错误（在任何 worker 启动之前报告）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("scenario has no traffic classes")]
    NoTrafficClasses,
    #[error("scenario has no processing paths")]
    NoPaths,
    #[error("at most {max} processing paths are supported, got {actual}")]
    TooManyPaths { max: usize, actual: usize },
    #[error("traffic class {name:?}: {field} must be {expected}, got {value}")]
    TrafficClass {
        name: String,
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("path {name:?}: {field} must be {expected}, got {value}")]
    Path {
        name: String,
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("episode: {field} must be {expected}, got {value}")]
    Episode {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("routing policy has {actual} entries but the scenario has {expected} traffic classes")]
    PolicyLength { expected: usize, actual: usize },
    #[error("routing policy entry for class {class} must be a probability in [0, 1], got {value}")]
    PolicyProbability { class: usize, value: f64 },
    #[error(
        "routing policy sends {value} of class {class} to the primary path, but there is no secondary path for the rest"
    )]
    MissingSecondaryPath { class: usize, value: f64 },
    #[error("routing weights for class {class} are unusable: {reason}")]
    RoutingWeights { class: usize, reason: String },
}

/// episode 级错误
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("failed to spawn {role} thread")]
    Spawn {
        role: String,
        #[source]
        source: std::io::Error,
    },
}

/// worker 单次迭代内的故障（记录并计数，worker 继续运行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkerFault {
    #[error("packet references unknown traffic class {0:?}")]
    UnknownClass(ClassId),
    #[error("routing chose unknown path {0:?}")]
    UnknownPath(PathId),
}
