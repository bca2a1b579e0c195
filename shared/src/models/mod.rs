//! Data models

pub mod order;

pub use order::{Customer, OrderItem, OrderRequest, OrderValidationError, Totals};
