//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{NewProduct, NewVariant, Product, ProductUuid, Variant, VariantDetails, VariantUuid},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_variant(&self, variant: VariantUuid) -> Result<VariantDetails, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let details = self.repository.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(details)
    }

    async fn update_price(
        &self,
        product: ProductUuid,
        price: u64,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_price(&mut tx, product, price).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_stock(
        &self,
        variant: VariantUuid,
        stock: u32,
    ) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.set_stock(&mut tx, variant, stock).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new product with the given name and price.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Creates a new variant under an existing product.
    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve the purchasable details of a variant: its product, the unit
    /// price the cart will capture, and the current stock.
    async fn get_variant(&self, variant: VariantUuid) -> Result<VariantDetails, CatalogServiceError>;

    /// Overwrite a product's unit price. Existing orders and cart lines keep
    /// the prices they captured.
    async fn update_price(
        &self,
        product: ProductUuid,
        price: u64,
    ) -> Result<Product, CatalogServiceError>;

    /// Overwrite a variant's stock count.
    async fn set_stock(
        &self,
        variant: VariantUuid,
        stock: u32,
    ) -> Result<Variant, CatalogServiceError>;
}
