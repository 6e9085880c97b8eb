//! Order wire types
//!
//! - [`Order`]: one ingested order, unknown payload fields preserved verbatim
//! - [`OrderStatus`]: the four-value status lifecycle
//! - [`OrderEvent`]: tagged events pushed to live dashboards

pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use event::OrderEvent;
pub use snapshot::{Order, PayloadError};
pub use types::{InvalidOrderStatus, OrderStatus, StatusChange};
