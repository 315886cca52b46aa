//! Cart handlers.

pub(crate) mod errors;
pub(crate) mod get;
pub(crate) mod items;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::CartItem;

/// One cart line as returned to the shopper.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u32,
    /// Unit price captured when the line was first added, in minor units.
    pub price: u64,
    pub subtotal: u64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            variant_uuid: item.variant_uuid.into_uuid(),
            quantity: item.quantity,
            subtotal: item.subtotal(),
            price: item.price,
        }
    }
}
