//! 健康检查路由
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "orders": 12, "clients": 2 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 已存储订单数
    orders: usize,
    /// 当前推送流连接数
    clients: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        orders: state.orders.len(),
        clients: state.live.subscriber_count(),
    })
}
