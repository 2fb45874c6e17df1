//! 数据包类型
//!
//! 仿真数据包不携带负载，只记录创建时间与所属流量类别。

use super::id::ClassId;
use crate::sim::SimTime;

/// 网络数据包（不可变值）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    created_at: SimTime,
    class: ClassId,
}

impl Packet {
    pub fn new(created_at: SimTime, class: ClassId) -> Self {
        Self { created_at, class }
    }

    /// 创建时间（单调时钟）
    pub fn created_at(&self) -> SimTime {
        self.created_at
    }

    /// 所属流量类别
    pub fn class(&self) -> ClassId {
        self.class
    }
}
