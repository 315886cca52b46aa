//! Cart
//!
//! The shopper-facing cart: an in-process store of pending line items that
//! mutates optimistically and reconciles with the durable store behind the
//! [`CartBackend`] boundary.

pub mod backend;
pub mod store;

pub use backend::{BackendError, CartBackend, DurableLine};
pub use store::{CartError, CartStore};

use uuid::Uuid;

/// Identity of a cart line as seen by the store.
///
/// A line starts out under a locally generated temporary key and gains a
/// durable key once the backend acknowledges its creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKey {
    /// Locally generated placeholder; the durable store has no record of it.
    Temp(Uuid),
    /// Server-assigned identity.
    Durable(Uuid),
}

impl LineKey {
    /// Whether this key is a local placeholder with no durable counterpart.
    #[must_use]
    pub fn is_temp(self) -> bool {
        matches!(self, Self::Temp(_))
    }
}

/// One (product, variant) entry with its captured pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product this line belongs to.
    pub product: Uuid,
    /// Purchasable variant of the product.
    pub variant: Uuid,
    /// Units in the cart. Always positive; zero deletes the line.
    pub quantity: u32,
    /// Unit price in minor units, captured when the line was first added.
    /// Never re-fetched from the live catalog.
    pub unit_price: u64,
    /// Variant stock observed when the line was last validated.
    pub stock: u32,
}

impl CartLine {
    /// Line subtotal: captured unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// Payload for adding a line to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    /// Product to add.
    pub product: Uuid,
    /// Variant to add.
    pub variant: Uuid,
    /// Units requested.
    pub quantity: u32,
    /// Current unit price from the catalog, captured into the line.
    pub unit_price: u64,
    /// Current variant stock from the catalog.
    pub stock: u32,
}
