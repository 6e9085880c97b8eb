//! GET /admin/stream
//!
//! Server-sent events: every live event as `data: <json>`, plus a
//! `: heartbeat` comment on the configured interval. The subscriber is
//! unregistered as soon as the client goes away.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::sse::Sse;

use crate::core::ServerState;

pub async fn live_stream(State(state): State<ServerState>) -> impl IntoResponse {
    let stream = state.open_live_stream();
    if let Some(id) = stream.subscriber_id() {
        tracing::info!(
            subscriber_id = %id,
            clients = state.live.subscriber_count(),
            "Admin stream opened"
        );
    }

    // 防止 nginx 等反向代理缓冲事件
    ([("x-accel-buffering", "no")], Sse::new(stream))
}
