//! 实时订单推送
//!
//! ```text
//! OrderEvent ──▶ Broadcaster ──▶ Subscription (per client queue) ──▶ LiveStream ──▶ SSE
//! ```
//!
//! - [`Broadcaster`]: 订阅者注册表，push 时序列化一次并扇出
//! - [`EventSink`]: 单个订阅者的非阻塞写入端
//! - [`LiveStream`]: 单个连接的状态机与心跳

mod broadcaster;
mod sink;
mod stream;

pub use broadcaster::{
    Broadcaster, DEFAULT_QUEUE_CAPACITY, PushReport, SubscriberId, Subscription,
};
pub use sink::{ChannelSink, EventSink, Frame, SinkError};
pub use stream::{HEARTBEAT_COMMENT, LiveStream, StreamFrame, StreamState};
