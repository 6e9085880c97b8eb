//! Order storage
//!
//! [`OrderStore`] owns every ingested [`Order`](shared::order::Order);
//! handlers only ever see clones.

mod store;

pub use store::{OrderStore, OrderStoreError, StoreResult};
