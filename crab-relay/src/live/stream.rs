//! LiveStream: 单个推送连接的生命周期
//!
//! 状态机: `Connecting → Streaming → Closed`
//!
//! - `open()` 注册到 Broadcaster 并启动心跳定时器，进入 `Streaming`
//! - 每个 Broadcaster 帧转成一个 `data: <json>` 事件
//! - 心跳定时器到期时输出 `: heartbeat` 注释帧
//! - 客户端断开（body 被 drop）、订阅者被移除或服务器关闭时进入 `Closed`；
//!   `close()` 只会生效一次：停止心跳、注销订阅者

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::response::sse::Event;
use futures::Stream;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use super::broadcaster::{Broadcaster, SubscriberId, Subscription};

pub const HEARTBEAT_COMMENT: &str = "heartbeat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Streaming,
    Closed,
}

/// 推送流中的一帧
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// 已序列化的事件 JSON
    Data(String),
    Heartbeat,
}

impl From<StreamFrame> for Event {
    fn from(frame: StreamFrame) -> Self {
        match frame {
            StreamFrame::Data(json) => Event::default().data(json),
            StreamFrame::Heartbeat => Event::default().comment(HEARTBEAT_COMMENT),
        }
    }
}

pub struct LiveStream {
    state: StreamState,
    subscriber_id: Option<SubscriberId>,
    subscription: Option<Subscription>,
    heartbeat: Option<Interval>,
    shutdown: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl LiveStream {
    /// 注册订阅者并开始推送
    pub fn open(
        broadcaster: &Broadcaster,
        heartbeat: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let mut stream = Self {
            state: StreamState::Connecting,
            subscriber_id: None,
            subscription: None,
            heartbeat: None,
            shutdown: Box::pin(shutdown.cancelled_owned()),
        };

        let subscription = broadcaster.register();
        // tokio 的 interval 不接受零周期
        let heartbeat = heartbeat.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + heartbeat, heartbeat);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        stream.subscriber_id = Some(subscription.id());
        stream.subscription = Some(subscription);
        stream.heartbeat = Some(interval);
        stream.state = StreamState::Streaming;
        stream
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn subscriber_id(&self) -> Option<SubscriberId> {
        self.subscriber_id
    }

    /// 关闭连接：停止心跳并注销订阅者，重复调用无副作用
    pub fn close(&mut self) {
        if self.state == StreamState::Closed {
            return;
        }
        self.state = StreamState::Closed;
        self.heartbeat = None;
        // Subscription::drop 负责 unregister
        self.subscription = None;
        if let Some(id) = self.subscriber_id {
            tracing::info!(subscriber_id = %id, "Live stream closed");
        }
    }

    fn poll_frame(&mut self, cx: &mut Context<'_>) -> Poll<Option<StreamFrame>> {
        if self.state != StreamState::Streaming {
            return Poll::Ready(None);
        }

        if self.shutdown.as_mut().poll(cx).is_ready() {
            self.close();
            return Poll::Ready(None);
        }

        if let Some(subscription) = self.subscription.as_mut() {
            match subscription.poll_recv(cx) {
                Poll::Ready(Some(frame)) => {
                    return Poll::Ready(Some(StreamFrame::Data(frame.to_string())));
                }
                Poll::Ready(None) => {
                    // Broadcaster 已移除该订阅者（队列溢出），结束流让客户端重连
                    self.close();
                    return Poll::Ready(None);
                }
                Poll::Pending => {}
            }
        }

        if let Some(interval) = self.heartbeat.as_mut()
            && interval.poll_tick(cx).is_ready()
        {
            return Poll::Ready(Some(StreamFrame::Heartbeat));
        }

        Poll::Pending
    }
}

impl Stream for LiveStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut()
            .poll_frame(cx)
            .map(|frame| frame.map(|f| Ok(Event::from(f))))
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.close();
    }
}
