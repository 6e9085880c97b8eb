//! In-memory order store
//!
//! Orders are kept newest-first. Every accessor takes the lock for the
//! whole operation and hands out clones, so a concurrent lister never sees
//! a half-applied status change.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::error::AppError;
use shared::order::{Order, StatusChange};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("order {0} not found")]
    NotFound(String),
}

impl From<OrderStoreError> for AppError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::Validation(msg) => {
                AppError::invalid_payload().with_detail("reason", msg)
            }
            OrderStoreError::NotFound(order_id) => AppError::order_not_found(order_id),
        }
    }
}

pub type StoreResult<T> = Result<T, OrderStoreError>;

/// Shared handle to the order list
///
/// Duplicate `order_id`s are accepted as independent records; lookups and
/// updates resolve to the most recently received one.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<VecDeque<Order>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert as the most recent order
    pub fn insert(&self, order: Order) -> StoreResult<()> {
        if order.order_id.trim().is_empty() {
            return Err(OrderStoreError::Validation("order_id is required".into()));
        }
        if !order.customer.is_object() {
            return Err(OrderStoreError::Validation("customer is required".into()));
        }

        let mut orders = self.orders.write();
        if orders.iter().any(|o| o.order_id == order.order_id) {
            tracing::warn!(order_id = %order.order_id, "Duplicate order_id stored as a new record");
        }
        orders.push_front(order);
        Ok(())
    }

    pub fn find_by_id(&self, order_id: &str) -> StoreResult<Order> {
        self.orders
            .read()
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
            .ok_or_else(|| OrderStoreError::NotFound(order_id.to_string()))
    }

    /// Apply a status change in place and return the updated order
    pub fn update_status(
        &self,
        order_id: &str,
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> StoreResult<Order> {
        let mut orders = self.orders.write();
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| OrderStoreError::NotFound(order_id.to_string()))?;
        order.apply(change, now);
        Ok(order.clone())
    }

    /// Snapshot of every order, newest first
    pub fn list_all(&self) -> Vec<Order> {
        self.orders.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}
