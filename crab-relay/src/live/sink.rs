//! 订阅者出站通道
//!
//! 每个订阅者一个有界队列，`try_send` 永不阻塞：
//! 队列满（客户端太慢）或已关闭（客户端断开）都返回错误，由 Broadcaster 移除该订阅者。

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

/// 已序列化的事件帧，所有订阅者共享同一份
pub type Frame = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("subscriber queue is full")]
    Full,
    #[error("subscriber is closed")]
    Closed,
}

/// 单个订阅者的写入端
pub trait EventSink: Send + Sync {
    /// 非阻塞写入一帧
    fn try_send(&self, frame: &Frame) -> Result<(), SinkError>;
}

/// 基于 mpsc 的默认实现，接收端由推送流持有
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Frame>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Frame>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn try_send(&self, frame: &Frame) -> Result<(), SinkError> {
        self.tx.try_send(frame.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}
