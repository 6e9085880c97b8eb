//! Order record as stored and broadcast

use super::types::{OrderStatus, StatusChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the relay; incoming values for these are discarded.
const RESERVED_KEYS: [&str; 5] = [
    "status",
    "received_at",
    "updated_at",
    "confirm_minutes",
    "confirmed_at",
];

/// Webhook payload rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// One restaurant order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by the external source)
    pub order_id: String,
    /// Customer data, opaque beyond being an object
    pub customer: Value,
    pub status: OrderStatus,
    /// Set at ingestion, never changes
    pub received_at: DateTime<Utc>,
    /// Stamped on every status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Remaining payload fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Build a pending order from a raw webhook payload
    ///
    /// Requires a non-empty string `order_id` and an object `customer`.
    pub fn from_payload(payload: Value, received_at: DateTime<Utc>) -> Result<Self, PayloadError> {
        let Value::Object(mut fields) = payload else {
            return Err(PayloadError::NotAnObject);
        };

        let order_id = match fields.remove("order_id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id,
            _ => return Err(PayloadError::MissingField("order_id")),
        };
        let customer = match fields.remove("customer") {
            Some(customer @ Value::Object(_)) => customer,
            _ => return Err(PayloadError::MissingField("customer")),
        };

        for key in RESERVED_KEYS {
            fields.remove(key);
        }

        Ok(Self {
            order_id,
            customer,
            status: OrderStatus::Pending,
            received_at,
            updated_at: None,
            confirm_minutes: None,
            confirmed_at: None,
            extra: fields,
        })
    }

    /// Apply a status change and stamp `updated_at`
    pub fn apply(&mut self, change: &StatusChange, now: DateTime<Utc>) {
        self.status = change.status;
        if let Some(minutes) = change.confirm_minutes {
            self.confirm_minutes = Some(minutes);
        }
        if let Some(at) = change.confirmed_at {
            self.confirmed_at = Some(at);
        }
        self.updated_at = Some(now);
    }

    /// Customer name, if the source sent one
    pub fn customer_name(&self) -> Option<&str> {
        self.customer.get("name").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_from_payload_sets_pending_and_keeps_extra_fields() {
        let payload = json!({
            "order_id": "A1",
            "customer": {"name": "Tom", "phone": "600"},
            "items": [{"sku": "paella", "qty": 2}],
            "total": 24.5,
        });

        let order = Order::from_payload(payload, t0()).unwrap();
        assert_eq!(order.order_id, "A1");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.received_at, t0());
        assert_eq!(order.customer_name(), Some("Tom"));
        assert_eq!(order.extra["items"][0]["sku"], "paella");
        assert_eq!(order.extra["total"], 24.5);
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn test_from_payload_overrides_reserved_fields() {
        let payload = json!({
            "order_id": "A1",
            "customer": {"name": "Tom"},
            "status": "confirmed",
            "received_at": "1999-01-01T00:00:00Z",
        });

        let order = Order::from_payload(payload, t0()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.received_at, t0());
        assert!(!order.extra.contains_key("status"));

        // serialized form has each key exactly once
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json.matches("\"status\"").count(), 1);
    }

    #[test]
    fn test_from_payload_missing_fields() {
        assert_eq!(
            Order::from_payload(json!({"customer": {"name": "Tom"}}), t0()),
            Err(PayloadError::MissingField("order_id"))
        );
        assert_eq!(
            Order::from_payload(json!({"order_id": "A1"}), t0()),
            Err(PayloadError::MissingField("customer"))
        );
        assert_eq!(
            Order::from_payload(json!({"order_id": "", "customer": {}}), t0()),
            Err(PayloadError::MissingField("order_id"))
        );
        assert_eq!(
            Order::from_payload(json!({"order_id": "A1", "customer": "Tom"}), t0()),
            Err(PayloadError::MissingField("customer"))
        );
        assert_eq!(
            Order::from_payload(json!([1, 2]), t0()),
            Err(PayloadError::NotAnObject)
        );
    }

    #[test]
    fn test_apply_only_overwrites_provided_fields() {
        let mut order =
            Order::from_payload(json!({"order_id": "A1", "customer": {"name": "Tom"}}), t0())
                .unwrap();

        let later = t0() + chrono::Duration::minutes(3);
        order.apply(
            &StatusChange::new(OrderStatus::Confirmed).with_confirm_minutes(20),
            later,
        );
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.confirm_minutes, Some(20));
        assert_eq!(order.updated_at, Some(later));

        order.apply(&StatusChange::new(OrderStatus::Cancelled), later);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.confirm_minutes, Some(20));
        assert_eq!(order.received_at, t0());
    }
}
