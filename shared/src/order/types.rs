//! Order status and status-change request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 新进订单，等待店员处理
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
        OrderStatus::Rejected,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status string outside the four-value lifecycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0:?}")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidOrderStatus(s.to_string()))
    }
}

/// Validated status change applied to a stored order
///
/// `confirm_minutes` / `confirmed_at` are only written when present;
/// an absent field leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub confirm_minutes: Option<u32>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl StatusChange {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            confirm_minutes: None,
            confirmed_at: None,
        }
    }

    pub fn with_confirm_minutes(mut self, minutes: u32) -> Self {
        self.confirm_minutes = Some(minutes);
        self
    }

    pub fn with_confirmed_at(mut self, at: DateTime<Utc>) -> Self {
        self.confirmed_at = Some(at);
        self
    }
}
