//! 路径队列
//!
//! 多生产者（路由到该路径的 generator）/ 多消费者（该路径的 processor）有界 FIFO。

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::net::Packet;

/// 出队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dequeue {
    Packet(Packet),
    /// 超时内没有 packet 到达（预期的控制流信号，不是错误）
    TimedOut,
}

#[derive(Debug)]
pub struct PathQueue {
    capacity: usize,
    tx: Sender<Packet>,
    rx: Receiver<Packet>,
}

impl PathQueue {
    pub fn new(capacity: usize) -> Self {
        // bounded(0) 是 rendezvous 通道，容量 0 的拒绝逻辑在 try_enqueue 中单独处理
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self { capacity, tx, rx }
    }

    /// 非阻塞入队：成功返回 Ok；队列已满则返回 Err(pkt)
    pub fn try_enqueue(&self, pkt: Packet) -> Result<(), Packet> {
        if self.capacity == 0 {
            return Err(pkt);
        }
        match self.tx.try_send(pkt) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(pkt)) | Err(TrySendError::Disconnected(pkt)) => Err(pkt),
        }
    }

    /// 阻塞出队，最多等待 `timeout`
    pub fn dequeue(&self, timeout: Duration) -> Dequeue {
        match self.rx.recv_timeout(timeout) {
            Ok(pkt) => Dequeue::Packet(pkt),
            // 两端都由本结构体持有，Disconnected 不会出现
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                Dequeue::TimedOut
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前占用率 `len / capacity`；容量为 0 的队列永远是满的，返回 1.0
    pub fn occupancy(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.len() as f64 / self.capacity as f64
    }
}
