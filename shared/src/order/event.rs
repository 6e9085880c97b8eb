//! Live events pushed to dashboard subscribers

use super::snapshot::Order;
use super::types::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event broadcast over the admin stream
///
/// Tagged by `type` so dashboards never have to guess from field presence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order arrived through the webhook
    OrderCreated { order: Order },
    /// An admin changed the status of an order
    StatusUpdated {
        order_id: String,
        status: OrderStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confirm_minutes: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confirmed_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    },
}

impl OrderEvent {
    pub fn created(order: Order) -> Self {
        Self::OrderCreated { order }
    }

    /// Status event carrying the changed subset of an order
    ///
    /// Falls back to `received_at` when the order was never updated.
    pub fn status_updated(order: &Order) -> Self {
        Self::StatusUpdated {
            order_id: order.order_id.clone(),
            status: order.status,
            confirm_minutes: order.confirm_minutes,
            confirmed_at: order.confirmed_at,
            updated_at: order.updated_at.unwrap_or(order.received_at),
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            Self::OrderCreated { order } => &order.order_id,
            Self::StatusUpdated { order_id, .. } => order_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "order_created",
            Self::StatusUpdated { .. } => "status_updated",
        }
    }
}
