//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        BackendError, CartBackend, CartError, CartLine, CartStore, DurableLine, LineKey, NewLine,
    },
    inventory::{StockError, check_addition, check_quantity},
    order::{InvalidTransition, OrderStatus},
};
