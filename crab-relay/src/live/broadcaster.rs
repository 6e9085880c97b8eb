//! Broadcaster: 订阅者注册表 + 事件扇出
//!
//! ```text
//! webhook / status handler
//!       │ OrderEvent
//!       ▼
//! Broadcaster::push ── 序列化一次 ──▶ Frame (Arc<str>)
//!       │ 持锁遍历 registry, try_send 不阻塞
//!       ├──▶ subscriber A queue ──▶ LiveStream A
//!       ├──▶ subscriber B queue ──▶ LiveStream B
//!       └──▶ subscriber C (full/closed) ──▶ 移除
//! ```
//!
//! push 在注册表锁内完成投递，因此：
//! - 每个订阅者看到的事件顺序与 push 调用顺序一致
//! - `unregister` 返回之后，不会再有事件进入该订阅者的队列

use std::collections::HashMap;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use shared::order::OrderEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::sink::{ChannelSink, EventSink, Frame};

/// 默认每个订阅者的队列容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

pub type SubscriberId = Uuid;

/// 一次 push 的投递结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    pub delivered: usize,
    pub dropped: usize,
}

struct Inner {
    subscribers: Mutex<HashMap<SubscriberId, Box<dyn EventSink>>>,
    queue_capacity: usize,
}

/// 订阅者注册表，clone 共享同一份状态
#[derive(Clone)]
pub struct Broadcaster {
    inner: Arc<Inner>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(queue_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: Mutex::new(HashMap::new()),
                queue_capacity: queue_capacity.max(1),
            }),
        }
    }

    /// 注册一个新的推送流订阅者
    ///
    /// 返回的 [`Subscription`] drop 时自动注销。
    pub fn register(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.inner.queue_capacity);
        let id = self.register_sink(Box::new(ChannelSink::new(tx)));
        Subscription {
            id,
            rx,
            broadcaster: self.clone(),
        }
    }

    /// 注册自定义 sink，调用方负责之后的 `unregister`
    pub fn register_sink(&self, sink: Box<dyn EventSink>) -> SubscriberId {
        let id = Uuid::new_v4();
        let total = {
            let mut subscribers = self.inner.subscribers.lock();
            subscribers.insert(id, sink);
            subscribers.len()
        };
        tracing::info!(subscriber_id = %id, total, "Live subscriber registered");
        id
    }

    /// 注销订阅者（幂等）
    ///
    /// 返回该订阅者此前是否仍在注册表中。
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let (removed, total) = {
            let mut subscribers = self.inner.subscribers.lock();
            let removed = subscribers.remove(&id).is_some();
            (removed, subscribers.len())
        };
        if removed {
            tracing::info!(subscriber_id = %id, total, "Live subscriber unregistered");
        }
        removed
    }

    /// 向所有当前订阅者推送事件
    ///
    /// 写入失败的订阅者（队列满或已断开）直接移除，不影响其他订阅者，
    /// 也不会把错误返回给触发 push 的请求。
    pub fn push(&self, event: &OrderEvent) -> PushReport {
        let frame: Frame = match serde_json::to_string(event) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                tracing::error!(
                    order_id = %event.order_id(),
                    error = %e,
                    "Failed to serialize live event"
                );
                return PushReport::default();
            }
        };

        let mut report = PushReport::default();
        let mut subscribers = self.inner.subscribers.lock();
        subscribers.retain(|id, sink| match sink.try_send(&frame) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(e) => {
                tracing::warn!(subscriber_id = %id, reason = %e, "Dropping live subscriber");
                report.dropped += 1;
                false
            }
        });
        drop(subscribers);

        tracing::debug!(
            event = event.kind(),
            order_id = %event.order_id(),
            delivered = report.delivered,
            dropped = report.dropped,
            "Live event pushed"
        );
        report
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.inner.subscribers.lock().contains_key(&id)
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("subscribers", &self.subscriber_count())
            .field("queue_capacity", &self.inner.queue_capacity)
            .finish()
    }
}

/// 一个已注册订阅者的接收端
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Frame>,
    broadcaster: Broadcaster,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// 等待下一帧；订阅者被移除且队列耗尽后返回 `None`
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Frame> {
        self.rx.try_recv().ok()
    }

    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.broadcaster.unregister(self.id);
    }
}
