//! Orders service.
//!
//! Placement is the single multi-statement transaction in the system: stock
//! reservation, order row, frozen items, and cart clear commit together or
//! not at all.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::order::{InvalidTransition, OrderStatus};
use tracing::warn;

use crate::{
    auth::models::UserUuid,
    database::Db,
    domain::{
        addresses::PgAddressesRepository,
        carts::PgCartItemsRepository,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
    notify::{OperatorNotifier, RefundNotice},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    cart_items: PgCartItemsRepository,
    addresses: PgAddressesRepository,
    notifier: Arc<dyn OperatorNotifier>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn OperatorNotifier>) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            addresses: PgAddressesRepository::new(),
            notifier,
        }
    }

    /// Constrained user-facing transition: ownership check, status machine
    /// check, then a conditional update that only fires while the row still
    /// holds the status we read.
    async fn transition(
        &self,
        user: UserUuid,
        order: OrderUuid,
        target: OrderStatus,
    ) -> Result<(OrderStatus, Order), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders.get_order(&mut tx, user, order).await?;
        let next = current.status.transition_to(target)?;

        let updated = self
            .orders
            .update_status(&mut tx, user, order, current.status, next)
            .await?;

        let Some(mut updated) = updated else {
            // The status moved underneath us; report against the fresh value.
            let fresh = self.orders.get_order(&mut tx, user, order).await?;

            return Err(InvalidTransition {
                from: fresh.status,
                to: target,
            }
            .into());
        };

        updated.items = self.orders.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok((current.status, updated))
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        if order.lines.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if order.lines.iter().any(|line| line.quantity == 0) {
            return Err(OrdersServiceError::NonPositiveQuantity);
        }

        let computed: u64 = order.lines.iter().map(|line| line.subtotal()).sum();

        if computed != order.total {
            return Err(OrdersServiceError::TotalMismatch {
                supplied: order.total,
                computed,
            });
        }

        let mut tx = self.db.begin().await?;

        // The address must resolve for the caller.
        self.addresses
            .get_address(&mut tx, user, order.address_uuid)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::InvalidReference,
                other => other.into(),
            })?;

        // Reserve stock per line with a conditional decrement. Any shortfall
        // aborts the whole transaction.
        for line in &order.lines {
            let rows_affected = self
                .orders
                .reserve_stock(&mut tx, line.variant_uuid, line.quantity)
                .await?;

            if rows_affected == 0 {
                return Err(OrdersServiceError::InsufficientStock {
                    variant: line.variant_uuid,
                });
            }
        }

        let mut created = self
            .orders
            .create_order(
                &mut tx,
                user,
                order.uuid,
                order.address_uuid,
                order.total,
                OrderStatus::Pending,
            )
            .await?;

        for line in &order.lines {
            let item = self.orders.create_order_item(&mut tx, order.uuid, line).await?;

            created.items.push(item);
        }

        self.cart_items.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders.get_order(&mut tx, user, order).await?;

        found.items = self.orders.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_orders(&mut tx, user).await?;

        for order in &mut orders {
            order.items = self.orders.get_order_items(&mut tx, order.uuid).await?;
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn pay(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let (_previous, paid) = self.transition(user, order, OrderStatus::Paid).await?;

        Ok(paid)
    }

    async fn cancel(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let (previous, cancelled) = self.transition(user, order, OrderStatus::Cancelled).await?;

        // A paid order needs its money back; hand the operator a refund
        // request. Fire-and-forget: failure is logged, never retried.
        if previous == OrderStatus::Paid {
            if let Err(error) = self
                .notifier
                .refund_requested(RefundNotice {
                    order: cancelled.uuid,
                    total: cancelled.total,
                })
                .await
            {
                warn!(order = %cancelled.uuid, "refund notification failed: {error}");
            }
        }

        Ok(cancelled)
    }

    async fn override_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.orders.override_status(&mut tx, order, status).await?;

        let Some(mut updated) = updated else {
            return Err(OrdersServiceError::NotFound);
        };

        updated.items = self.orders.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn a validated cart snapshot into a `PENDING` order, reserving stock
    /// and clearing the cart in the same transaction.
    async fn place_order(&self, user: UserUuid, order: NewOrder)
    -> Result<Order, OrdersServiceError>;

    /// Retrieve one of the user's orders, with its items.
    async fn get_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<Order, OrdersServiceError>;

    /// Retrieves all of the user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// `PENDING → PAID`, owner only.
    async fn pay(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Cancel from `PENDING` or `PAID`, owner only. A paid cancellation
    /// raises a refund notice to the operator.
    async fn cancel(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Overwrite the status unconditionally, with no ownership or transition
    /// check. Admin capability; the router must gate it.
    async fn override_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
