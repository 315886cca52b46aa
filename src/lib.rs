//! Storefront
//!
//! Storefront is the protocol engine behind a small e-commerce shop: an optimistic
//! cart store with confirm-or-revert semantics, stock admission checks, and the
//! order status machine. It performs no I/O of its own; durable persistence sits
//! behind the [`cart::CartBackend`] boundary.

pub mod cart;
pub mod inventory;
pub mod order;
pub mod prelude;
