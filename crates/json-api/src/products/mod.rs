//! Product handlers.

pub(crate) mod errors;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update_price;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::catalog::models::Product;

/// A product as returned to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    /// Current unit price, in minor units.
    pub price: u64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            price: product.price,
        }
    }
}
