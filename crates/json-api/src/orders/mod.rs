//! Order handlers.

pub(crate) mod cancel;
pub(crate) mod checkout;
pub(crate) mod errors;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod pay;
pub(crate) mod status;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{Order, OrderItem};

/// One frozen order line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u32,
    /// Unit price captured at order creation, in minor units.
    pub price: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            variant_uuid: item.variant_uuid.into_uuid(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// An order as returned to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub address_uuid: Uuid,
    /// Frozen at creation, in minor units.
    pub total: u64,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            address_uuid: order.address_uuid.into_uuid(),
            total: order.total,
            status: order.status.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
        }
    }
}
