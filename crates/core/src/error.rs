//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic failure of a catalog, ticket or sale rule.
///
/// Backend and configuration failures have their own error types in
/// `ticketpos-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rejected input (blank product name, malformed amount, empty ticket).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A stock decrement asked for more units than are available.
    #[error("insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },

    /// An amount or quantity product does not fit the money representation.
    #[error("amount exceeds the representable range")]
    AmountOverflow,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Identifier already taken.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn insufficient_stock(product: impl Into<String>, available: u32, requested: u32) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            available,
            requested,
        }
    }

    pub fn amount_overflow() -> Self {
        Self::AmountOverflow
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
