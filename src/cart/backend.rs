//! Durable store boundary for the cart.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::cart::NewLine;

/// Durable state returned by the backend after a successful create.
///
/// The quantity is the server-validated one, which the store adopts in place
/// of its optimistic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurableLine {
    /// Server-assigned identity.
    pub id: Uuid,
    /// Quantity the server accepted.
    pub quantity: u32,
}

/// Errors surfaced by the durable store.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store rejected the mutation, e.g. a server-side stock check failed.
    #[error("durable store rejected the mutation: {0}")]
    Rejected(String),

    /// The store could not be reached or failed mid-request.
    #[error("durable store unavailable")]
    Unavailable,
}

/// Persistence operations the cart store issues.
///
/// Every call is a suspension point; the store holds no lock across it and
/// restores its pre-mutation snapshot when a call fails or times out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Persist a new cart line, returning its durable identity.
    async fn create_item(&self, line: NewLine) -> Result<DurableLine, BackendError>;

    /// Overwrite the quantity of an existing line.
    async fn update_item(&self, id: Uuid, quantity: u32) -> Result<(), BackendError>;

    /// Delete an existing line.
    async fn delete_item(&self, id: Uuid) -> Result<(), BackendError>;
}
