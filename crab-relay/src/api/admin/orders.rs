//! Admin order handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::order::{Order, OrderEvent, OrderStatus, StatusChange};

use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub count: usize,
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

/// PATCH body
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
    pub confirm_minutes: Option<u32>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// GET /admin/orders - 全部订单，最新在前
pub async fn list_orders(State(state): State<ServerState>) -> Json<OrderListResponse> {
    let orders = state.orders.list_all();
    Json(OrderListResponse {
        success: true,
        count: orders.len(),
        orders,
    })
}

/// GET /admin/orders/{order_id}
pub async fn get_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.orders.find_by_id(&order_id)?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// PATCH /admin/orders/{order_id}/status
///
/// The status is validated before the order is looked up, so an invalid
/// status on an unknown order is reported as 400, not 404.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> AppResult<Json<OrderResponse>> {
    let Json(req) = body.map_err(|e| AppError::invalid_request(e.body_text()))?;

    let raw = req.status.unwrap_or_default();
    let status: OrderStatus = raw.parse().map_err(|_| {
        tracing::warn!(order_id = %order_id, status = %raw, "Rejected status update");
        AppError::invalid_status(raw.as_str())
    })?;

    let mut change = StatusChange::new(status);
    if let Some(minutes) = req.confirm_minutes {
        change = change.with_confirm_minutes(minutes);
    }
    if let Some(at) = req.confirmed_at {
        change = change.with_confirmed_at(at);
    }

    let order = state
        .orders
        .update_status(&order_id, &change, state.clock.now())?;

    tracing::info!(order_id = %order_id, status = %order.status, "Order status updated");
    state.live.push(&OrderEvent::status_updated(&order));

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}
