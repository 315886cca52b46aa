//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::models::UserUuid,
    database::Db,
    domain::addresses::{
        errors::AddressesServiceError,
        models::{Address, AddressUuid, NewAddress},
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, user).await?;

        tx.commit().await?;

        Ok(addresses)
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Creates a new address owned by the user.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;

    /// Retrieve one of the user's addresses.
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError>;

    /// Retrieves all of the user's addresses.
    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<Address>, AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn created_address_is_retrievable_by_its_owner() -> TestResult {
        let ctx = TestContext::new().await;

        let address = ctx.create_address(ctx.user).await?;
        let fetched = ctx.addresses.get_address(ctx.user, address).await?;

        assert_eq!(fetched.uuid, address);

        Ok(())
    }

    #[tokio::test]
    async fn foreign_address_is_invisible() -> TestResult {
        let ctx = TestContext::new().await;

        let address = ctx.create_address(ctx.user).await?;
        let other = ctx.create_user("Other Shopper").await?;

        let result = ctx.addresses.get_address(other, address).await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound for foreign address, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_addresses_returns_only_own_rows() -> TestResult {
        let ctx = TestContext::new().await;

        let own = ctx.create_address(ctx.user).await?;

        let other = ctx.create_user("Other Shopper").await?;
        ctx.create_address(other).await?;

        let addresses = ctx.addresses.list_addresses(ctx.user).await?;

        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses.first().map(|a| a.uuid), Some(own));

        Ok(())
    }
}
