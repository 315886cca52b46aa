//! Order Models

use jiff::Timestamp;
use storefront::order::OrderStatus;

use crate::{
    auth::models::UserUuid,
    domain::{
        addresses::models::AddressUuid,
        catalog::models::{ProductUuid, VariantUuid},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
///
/// Immutable once created, except for `status`.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub address_uuid: AddressUuid,
    /// Frozen at creation; never recomputed from live prices.
    pub total: u64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// OrderItem Model
///
/// A frozen line: quantity and the unit price captured at order creation.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub price: u64,
}

/// New Order Model: the cart snapshot handed to checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub address_uuid: AddressUuid,
    pub lines: Vec<OrderLine>,
    /// Precomputed by the cart; must equal the sum of the line subtotals.
    pub total: u64,
}

/// One line of the checkout snapshot, carrying the unit price captured when
/// the item was added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub price: u64,
}

impl OrderLine {
    /// Line subtotal from the captured price.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}
