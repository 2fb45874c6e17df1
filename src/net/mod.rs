//! 网络模型模块
//!
//! 此模块包含数据包、标识符与路由策略。

// 子模块声明
mod id;
mod packet;
mod routing;

// 重新导出公共接口
pub use id::{ClassId, PathId};
pub use packet::Packet;
pub use routing::{PathChooser, RoutingPolicy};
