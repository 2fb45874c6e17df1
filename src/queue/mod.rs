//! 队列（Queue disciplines）
//!
//! 每条处理路径一个有界 FIFO：满时直接拒绝新到达的 packet（尾丢弃），出队可带超时阻塞。

mod path_queue;

pub use path_queue::{Dequeue, PathQueue};
