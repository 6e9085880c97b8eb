//! Order webhook
//!
//! POST /webhook/orders
//!
//! The external order source posts one order per request. The body must
//! carry `order_id` and a `customer` object; everything else is stored as-is.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use shared::error::{AppError, AppResult};
use shared::order::{Order, OrderEvent};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/webhook/orders", post(receive_order))
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub order_id: String,
}

pub async fn receive_order(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<WebhookAck>> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook body");
        AppError::invalid_payload().with_detail("reason", e.body_text())
    })?;

    let order = Order::from_payload(payload, state.clock.now()).map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook order");
        AppError::invalid_payload().with_detail("reason", e.to_string())
    })?;

    let order_id = order.order_id.clone();
    tracing::info!(
        order_id = %order_id,
        customer = order.customer_name().unwrap_or("-"),
        "Order received"
    );

    state.orders.insert(order.clone())?;

    // try_send only, slow dashboards never hold up the source
    state.live.push(&OrderEvent::created(order));

    Ok(Json(WebhookAck {
        received: true,
        order_id,
    }))
}
