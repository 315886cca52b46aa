//! Catalog
//!
//! Products and their purchasable variants. The cart and order protocol only
//! reads from here; stock reservations at checkout go through the orders
//! repository.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;

pub(crate) use repository::{
    PgCatalogRepository, try_bind_amount, try_bind_count, try_get_amount, try_get_count,
};
