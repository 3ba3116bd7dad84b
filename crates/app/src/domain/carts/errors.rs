//! Carts service errors.

use thiserror::Error;

use crate::{
    domain::{ErrorKind, carts::pricing::PricingError, products::models::ProductUuid},
    storage::StoreError,
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("product is not in the cart")]
    LineNotFound,

    #[error("only {available} in stock for product {product}, requested {requested}")]
    InsufficientStock {
        product: ProductUuid,
        available: u32,
        requested: u32,
    },

    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("cart totals are inconsistent")]
    Inconsistent(#[from] PricingError),

    #[error("storage error")]
    Storage(#[from] StoreError),
}

impl CartsServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CartNotFound | Self::ProductNotFound | Self::LineNotFound => ErrorKind::NotFound,
            Self::Invalid(_) | Self::InsufficientStock { .. } => ErrorKind::InvalidInput,
            Self::EmptyCart => ErrorKind::InvalidState,
            Self::Inconsistent(_) => ErrorKind::ConsistencyViolation,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}
