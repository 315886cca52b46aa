//! Cart backend over the carts service.
//!
//! Adapts a user-scoped view of [`CartsService`] to the optimistic store's
//! [`CartBackend`] boundary, so a `CartStore` can reconcile directly against
//! Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use storefront::cart::{BackendError, CartBackend, DurableLine, NewLine};
use uuid::Uuid;

use crate::{
    auth::models::UserUuid,
    domain::carts::{
        errors::CartsServiceError,
        models::{CartItemUuid, NewCartItem},
        service::CartsService,
    },
};

/// A user-scoped durable cart backend.
#[derive(Clone)]
pub struct PgCartBackend {
    service: Arc<dyn CartsService>,
    user: UserUuid,
}

impl PgCartBackend {
    #[must_use]
    pub fn new(service: Arc<dyn CartsService>, user: UserUuid) -> Self {
        Self { service, user }
    }
}

#[async_trait]
impl CartBackend for PgCartBackend {
    async fn create_item(&self, line: NewLine) -> Result<DurableLine, BackendError> {
        let item = self
            .service
            .add_item(
                self.user,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: line.product.into(),
                    variant_uuid: line.variant.into(),
                    quantity: line.quantity,
                },
            )
            .await
            .map_err(into_backend_error)?;

        Ok(DurableLine {
            id: item.uuid.into_uuid(),
            quantity: item.quantity,
        })
    }

    async fn update_item(&self, id: Uuid, quantity: u32) -> Result<(), BackendError> {
        self.service
            .update_item(self.user, id.into(), i64::from(quantity))
            .await
            .map(|_outcome| ())
            .map_err(into_backend_error)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), BackendError> {
        self.service
            .remove_item(self.user, id.into())
            .await
            .map_err(into_backend_error)
    }
}

fn into_backend_error(error: CartsServiceError) -> BackendError {
    match error {
        CartsServiceError::Sql(_) => BackendError::Unavailable,
        rejected => BackendError::Rejected(rejected.to_string()),
    }
}
