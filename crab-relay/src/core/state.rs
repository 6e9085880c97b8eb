//! Shared server state

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::live::{Broadcaster, LiveStream};
use crate::orders::OrderStore;

/// 服务器状态 - 所有 handler 共享
///
/// clone 只复制句柄，store / broadcaster / token 指向同一份数据。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    /// 订单存储
    pub orders: OrderStore,
    /// 实时推送注册表
    pub live: Broadcaster,
    /// received_at / updated_at 的时间来源
    pub clock: Arc<dyn Clock>,
    /// 关闭信号，触发后所有推送流结束
    pub shutdown: CancellationToken,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let live = Broadcaster::with_capacity(config.subscriber_queue_capacity);
        Self {
            config: Arc::new(config),
            orders: OrderStore::new(),
            live,
            clock,
            shutdown: CancellationToken::new(),
        }
    }

    /// 为新连接打开推送流
    pub fn open_live_stream(&self) -> LiveStream {
        LiveStream::open(
            &self.live,
            self.config.heartbeat_interval,
            self.shutdown.clone(),
        )
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down, closing live streams");
        self.shutdown.cancel();
    }
}
