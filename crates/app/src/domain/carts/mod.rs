//! Carts
//!
//! The durable cart: one row per (user, product, variant), price captured at
//! first add, quantities admitted by the stock guard. [`backend`] adapts the
//! service to the optimistic store's `CartBackend` boundary.

pub mod backend;
pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use backend::PgCartBackend;
pub use errors::CartsServiceError;
pub use service::*;

pub(crate) use repository::PgCartItemsRepository;
