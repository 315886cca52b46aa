//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::catalog::models::{ProductUuid, VariantUuid},
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    /// Unit price in minor units, captured when the line was first added.
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    /// Line subtotal from the captured price.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

/// New CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
}

/// A user's cart as the storefront sees it.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of the captured line subtotals.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

/// Outcome of a quantity update: zero and below remove the line.
#[derive(Debug, Clone)]
pub enum CartMutation {
    Updated(CartItem),
    Removed,
}
