//! Shared types for the order ticket pipeline
//!
//! Order wire models, order file naming, response bodies and the cloud
//! client used by both the intake server and the print client.

pub mod cloud;
pub mod models;
pub mod naming;
pub mod response;

// Re-exports
pub use cloud::{
    CloudConfig, CloudError, CloudResult, MemoryCloud, OrderCloud, OrderRecord, SupabaseClient,
};
pub use models::{Customer, OrderItem, OrderRequest, OrderValidationError, Totals};
pub use naming::OrderFileNaming;
pub use response::{ErrorBody, HealthStatus, OrderSubmitted};
