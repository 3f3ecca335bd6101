//! Service-level error model.

use thiserror::Error;

use ticketpos_core::DomainError;
use ticketpos_products::ProductId;

/// Failure of a catalog/sales service call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Deterministic domain failure (validation, invariant, conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// A record was read or written under the wrong business.
    #[error("business isolation violation: {0}")]
    BusinessIsolation(String),

    /// The hosted backend could not be reached or rejected the request.
    #[error("backend error: {0}")]
    Backend(String),
}

impl ServiceError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Backend(_))
    }
}
