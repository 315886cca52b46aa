//! Carts service.
//!
//! Stock checks here are advisory pre-checks against the catalog's current
//! count; the binding reservation happens inside the order-placement
//! transaction.

use async_trait::async_trait;
use mockall::automock;
use storefront::inventory;

use crate::{
    auth::models::UserUuid,
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartItemUuid, CartMutation, NewCartItem},
            repository::PgCartItemsRepository,
        },
        catalog::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items: PgCartItemsRepository,
    catalog: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items: PgCartItemsRepository::new(),
            catalog: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.items.get_cart_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart { items })
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let details = self.catalog.get_variant(&mut tx, item.variant_uuid).await?;

        if details.product_uuid != item.product_uuid {
            return Err(CartsServiceError::InvalidReference);
        }

        let existing = self
            .items
            .find_by_variant(&mut tx, user, item.variant_uuid)
            .await?;

        let item = if let Some(existing) = existing {
            // Merge, never duplicate: the admission check runs against the
            // prospective total.
            inventory::check_addition(existing.quantity, item.quantity, details.stock)?;

            self.items
                .update_quantity(
                    &mut tx,
                    user,
                    existing.uuid,
                    existing.quantity.saturating_add(item.quantity),
                )
                .await?
        } else {
            inventory::check_quantity(item.quantity, details.stock)?;

            self.items
                .create_cart_item(&mut tx, user, item.uuid, item.variant_uuid, item.quantity)
                .await?
        };

        tx.commit().await?;

        Ok(item)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<CartMutation, CartsServiceError> {
        // Zero and below is a removal request, not a rejection.
        if quantity <= 0 {
            self.remove_item(user, item).await?;

            return Ok(CartMutation::Removed);
        }

        let quantity = u32::try_from(quantity).map_err(|_e| CartsServiceError::InvalidData)?;

        let mut tx = self.db.begin().await?;

        let current = self.items.get_cart_item(&mut tx, user, item).await?;
        let details = self
            .catalog
            .get_variant(&mut tx, current.variant_uuid)
            .await?;

        inventory::check_quantity(quantity, details.stock)?;

        let updated = self
            .items
            .update_quantity(&mut tx, user, item, quantity)
            .await?;

        tx.commit().await?;

        Ok(CartMutation::Updated(updated))
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.items.delete_cart_item(&mut tx, user, item).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add an item to the user's cart. An add for a variant already in the
    /// cart increases that line's quantity instead of creating a second row.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Overwrite a line's quantity; zero and below deletes the line.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<CartMutation, CartsServiceError>;

    /// Delete a line from the user's cart.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid)
    -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::inventory::StockError;
    use testresult::TestResult;

    use crate::{domain::catalog::CatalogService, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn add_item_captures_the_current_price() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;

        let item = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    variant_uuid: variant,
                    quantity: 2,
                },
            )
            .await?;

        assert_eq!(item.product_uuid, product);
        assert_eq!(item.variant_uuid, variant);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 100_000);
        assert_eq!(item.subtotal(), 200_000);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_variant_twice_merges_into_one_line() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 5).await?;

        let first = ctx.add_to_cart(product, variant, 1).await?;
        let second = ctx.add_to_cart(product, variant, 2).await?;

        assert_eq!(first.uuid, second.uuid, "merge must reuse the row");
        assert_eq!(second.quantity, 3);

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(cart.items.len(), 1, "never two lines for one variant");
        assert_eq!(cart.total(), 300_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_beyond_stock_is_rejected_with_available_count() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;

        let result = ctx.add_to_cart(product, variant, 4).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Stock(StockError::InsufficientStock {
                    requested: 4,
                    available: 3,
                }))
            ),
            "expected insufficient stock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert!(cart.items.is_empty(), "rejected add must not insert");

        Ok(())
    }

    #[tokio::test]
    async fn merge_beyond_stock_leaves_the_line_unchanged() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;

        let item = ctx.add_to_cart(product, variant, 2).await?;
        let result = ctx.add_to_cart(product, variant, 2).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Stock(StockError::InsufficientStock {
                    requested: 4,
                    available: 3,
                }))
            ),
            "expected insufficient stock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(
            cart.items.first().map(|i| (i.uuid, i.quantity)),
            Some((item.uuid, 2))
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_beyond_stock_is_rejected_and_quantity_unchanged() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;
        let item = ctx.add_to_cart(product, variant, 2).await?;

        let result = ctx.carts.update_item(ctx.user, item.uuid, 5).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Stock(StockError::InsufficientStock {
                    requested: 5,
                    available: 3,
                }))
            ),
            "expected insufficient stock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(cart.items.first().map(|i| i.quantity), Some(2));

        // Raising to exactly the stock succeeds.
        let outcome = ctx.carts.update_item(ctx.user, item.uuid, 3).await?;

        assert!(
            matches!(outcome, CartMutation::Updated(ref updated) if updated.quantity == 3),
            "got {outcome:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_to_zero_removes_the_line() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;
        let item = ctx.add_to_cart(product, variant, 2).await?;

        let outcome = ctx.carts.update_item(ctx.user, item.uuid, 0).await?;

        assert!(matches!(outcome, CartMutation::Removed), "got {outcome:?}");

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_the_row() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;
        let item = ctx.add_to_cart(product, variant, 2).await?;

        ctx.carts.remove_item(ctx.user, item.uuid).await?;

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_item_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.remove_item(ctx.user, CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn items_of_other_users_are_invisible() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;
        let item = ctx.add_to_cart(product, variant, 2).await?;

        let other = ctx.create_user("Other Shopper").await?;

        let result = ctx.carts.update_item(other, item.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for foreign item, got {result:?}"
        );

        let result = ctx.carts.remove_item(other, item.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for foreign item, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_with_unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: crate::domain::catalog::models::ProductUuid::new(),
                    variant_uuid: crate::domain::catalog::models::VariantUuid::new(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_with_mismatched_product_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let (_product_a, variant_a) = ctx.create_product("Alpha", 10_000, 3).await?;
        let (product_b, _variant_b) = ctx.create_product("Beta", 20_000, 3).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product_b,
                    variant_uuid: variant_a,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn price_change_does_not_touch_captured_cart_prices() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = ctx.create_product("Batik Shirt", 100_000, 3).await?;
        let item = ctx.add_to_cart(product, variant, 2).await?;

        ctx.catalog.update_price(product, 175_000).await?;

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(
            cart.items.first().map(|i| i.price),
            Some(item.price),
            "captured price must not follow the catalog"
        );
        assert_eq!(cart.total(), 200_000);

        Ok(())
    }
}
