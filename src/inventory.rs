//! Stock admission checks.
//!
//! The guard decides whether a requested quantity is satisfiable for a variant.
//! It never mutates stock; callers re-run it on every cart mutation because
//! stock can change between checks.

use thiserror::Error;

/// Errors produced by stock admission checks.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    /// Quantities below one are never admissible for an add.
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,

    /// The variant cannot satisfy the requested quantity.
    #[error("insufficient stock: requested {requested}, {available} available")]
    InsufficientStock {
        /// Quantity the caller asked for.
        requested: u32,
        /// Stock the variant currently holds.
        available: u32,
    },
}

/// Admit setting a cart line to `requested` units against the variant's stock.
///
/// # Errors
///
/// Returns [`StockError::NonPositiveQuantity`] for a zero request and
/// [`StockError::InsufficientStock`] when `requested` exceeds `stock`.
pub fn check_quantity(requested: u32, stock: u32) -> Result<(), StockError> {
    if requested == 0 {
        return Err(StockError::NonPositiveQuantity);
    }

    if requested > stock {
        return Err(StockError::InsufficientStock {
            requested,
            available: stock,
        });
    }

    Ok(())
}

/// Admit adding `additional` units on top of an existing cart line.
///
/// The check runs against the prospective total (existing + additional), not
/// the increment alone.
///
/// # Errors
///
/// Returns [`StockError::NonPositiveQuantity`] when `additional` is zero and
/// [`StockError::InsufficientStock`] when the prospective total exceeds `stock`.
pub fn check_addition(existing: u32, additional: u32, stock: u32) -> Result<(), StockError> {
    if additional == 0 {
        return Err(StockError::NonPositiveQuantity);
    }

    check_quantity(existing.saturating_add(additional), stock)
}
