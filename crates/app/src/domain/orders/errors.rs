//! Orders service errors.

use thiserror::Error;

use crate::{
    domain::{ErrorKind, carts::pricing::PricingError},
    storage::StoreError,
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("order not found")]
    OrderNotFound,

    #[error("no free order code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("order totals are inconsistent")]
    Inconsistent(#[from] PricingError),

    #[error("storage error")]
    Storage(#[from] StoreError),
}

impl OrdersServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CartNotFound | Self::OrderNotFound => ErrorKind::NotFound,
            Self::Invalid(_) => ErrorKind::InvalidInput,
            Self::EmptyCart => ErrorKind::InvalidState,
            Self::Inconsistent(_) => ErrorKind::ConsistencyViolation,
            Self::CodeSpaceExhausted { .. } | Self::Storage(_) => ErrorKind::Internal,
        }
    }
}
