//! Admin dashboard API

mod orders;
mod stream;

use axum::Router;
use axum::routing::{get, patch};

use crate::core::ServerState;

pub use orders::{OrderListResponse, OrderResponse, StatusUpdateRequest};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/admin/orders", get(orders::list_orders))
        .route("/admin/orders/{order_id}", get(orders::get_order))
        .route(
            "/admin/orders/{order_id}/status",
            patch(orders::update_status),
        )
        .route("/admin/stream", get(stream::live_stream))
}
