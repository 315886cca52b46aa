//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::order::InvalidTransition;
use thiserror::Error;

use crate::domain::catalog::models::VariantUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Checkout with no lines.
    #[error("order has no lines")]
    EmptyOrder,

    /// A line with a non-positive quantity.
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,

    /// The supplied total disagrees with the line subtotals.
    #[error("order total {supplied} does not match line total {computed}")]
    TotalMismatch { supplied: u64, computed: u64 },

    /// The conditional stock decrement found fewer units than requested.
    #[error("insufficient stock for variant {variant}")]
    InsufficientStock { variant: VariantUuid },

    /// The status machine refused the requested transition.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("order already exists")]
    AlreadyExists,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
