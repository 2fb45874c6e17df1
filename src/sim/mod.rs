//! 仿真时间模块
//!
//! 此模块包含仿真使用的时间类型与时钟。所有时间戳（packet 创建、时延、节拍、终止判断）
//! 都来自同一个单调时钟。

// 子模块声明
mod clock;
mod time;

// 重新导出公共接口
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use time::SimTime;
