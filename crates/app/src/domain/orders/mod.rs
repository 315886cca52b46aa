//! Orders
//!
//! The order placement protocol and the order lifecycle. Placement turns a
//! validated cart snapshot into an order atomically; afterwards the status
//! machine governs the object.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
