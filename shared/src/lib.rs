//! Shared types for the Crab order relay
//!
//! Wire types exchanged with the webhook source and the admin dashboard,
//! plus the unified error system used by the HTTP layer.

pub mod error;
pub mod order;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use order::{Order, OrderEvent, OrderStatus, StatusChange};
