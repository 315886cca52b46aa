//! Catalog Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    /// Unit price in minor units.
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<Variant>;

/// Variant Model
#[derive(Debug, Clone)]
pub struct Variant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    /// Display name, e.g. a size.
    pub name: String,
    pub stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Variant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub stock: u32,
}

/// What the cart protocol looks up per variant: identity, the unit price it
/// will capture, and the stock it checks against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDetails {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub stock: u32,
}
