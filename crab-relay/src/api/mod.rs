//! HTTP API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /webhook/orders | POST | 外部订单来源推送新订单 |
//! | /admin/orders | GET | 订单列表 (newest first) |
//! | /admin/orders/{order_id} | GET | 单个订单 |
//! | /admin/orders/{order_id}/status | PATCH | 修改订单状态 |
//! | /admin/stream | GET | SSE 实时推送 |
//! | /health | GET | 健康检查 |
//! | /admin, 其他 | GET | 静态 dashboard 资源 |

pub mod admin;
pub mod health;
pub mod webhook;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all API routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Order source webhook
        .merge(webhook::router())
        // Admin dashboard API + live stream
        .merge(admin::router())
        // Health API
        .merge(health::router())
}

/// Build a fully configured application with static assets, middleware and state
pub fn build_app(state: &ServerState) -> Router {
    let public_dir = state.config.public_dir.clone();

    build_router()
        // ========== Static dashboard ==========
        .route_service("/admin", ServeFile::new(public_dir.join("admin.html")))
        .fallback_service(ServeDir::new(public_dir))
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state.clone())
}
