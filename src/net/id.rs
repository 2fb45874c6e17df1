//! 标识符类型
//!
//! 定义流量类别与处理路径的索引。

use serde::{Deserialize, Serialize};

/// 流量类别标识符（`ScenarioConfig::traffic_classes` 中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub usize);

/// 处理路径标识符（`ScenarioConfig::paths` 中的下标；0 为主路径，1 为备用路径）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(pub usize);

impl PathId {
    pub const PRIMARY: PathId = PathId(0);
    pub const SECONDARY: PathId = PathId(1);
}
