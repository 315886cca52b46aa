//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    auth::{
        errors::AuthServiceError,
        models::{ApiTokenUuid, Caller, NewUser, User, UserUuid},
        repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<Caller, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let caller = self
            .repository
            .find_caller_by_token_hash(&mut tx, &hash_token(token))
            .await?;

        tx.commit().await?;

        Ok(caller)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError> {
        let raw = generate_token();

        let mut tx = self.db.begin().await?;

        self.repository
            .create_token(&mut tx, ApiTokenUuid::new(), user, &hash_token(&raw))
            .await?;

        tx.commit().await?;

        Ok(raw)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the caller it identifies.
    async fn authenticate_bearer(&self, token: &str) -> Result<Caller, AuthServiceError>;

    /// Creates a new user.
    async fn create_user(&self, user: NewUser) -> Result<User, AuthServiceError>;

    /// Issue a fresh API token for the user, returning the raw token.
    /// Only the SHA-256 hash is stored.
    async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError>;
}

fn generate_token() -> String {
    format!("sf_{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}

fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
