//! 仿真引擎
//!
//! generator 池按类别速率注入 packet，processor 池按路径服务速率排空队列，
//! reporter 周期性输出快照；`run_episode` 负责启动、等待与汇总。

mod context;
mod episode;
mod generator;
mod processor;
mod reporter;

pub use context::EpisodeContext;
pub use episode::{run_episode, run_episode_with_clock};
pub use generator::{Admission, GeneratorWorker};
pub use processor::{ProcessorWorker, Service};
pub use reporter::Reporter;
