//! Storage boundary.
//!
//! Services open a transaction with [`Store::begin`], call repository methods
//! on it, then [`StoreTx::commit`] or [`StoreTx::rollback`]. The repositories
//! themselves are traits implemented by every transaction type, so the same
//! service code runs against Postgres and the in-memory store.

use std::fmt::Display;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tracing::warn;

use crate::domain::{
    carts::repository::CartsRepository, orders::repository::OrdersRepository,
    products::repository::ProductsRepository,
};

pub mod memory;
pub mod postgres;

pub use memory::{Fault, MemoryStore};
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    Conflict,

    #[error("related record not found")]
    InvalidReference,

    #[error("constraint violated")]
    ConstraintViolation,

    #[error("stored value out of range: {0}")]
    OutOfRange(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => {
                Self::ConstraintViolation
            }
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// A source of storage transactions.
#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTx;

    /// Open a transaction.
    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One open storage transaction.
///
/// Dropping a transaction without committing discards its writes.
#[async_trait]
pub trait StoreTx: CartsRepository + ProductsRepository + OrdersRepository + Send {
    /// Make every write in this transaction durable.
    async fn commit(self) -> Result<(), StoreError>;

    /// Discard every write in this transaction.
    async fn rollback(self) -> Result<(), StoreError>;
}

/// Whether the backing store can currently serve requests.
#[automock]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<(), StoreError>;
}

/// Commit `tx` when `result` is `Ok`, otherwise roll it back.
///
/// A failed rollback is logged and the original error is returned unchanged.
///
/// # Errors
///
/// Returns the error carried by `result`, or the commit failure.
pub async fn finish<Tx, T, E>(tx: Tx, result: Result<T, E>) -> Result<T, E>
where
    Tx: StoreTx,
    E: From<StoreError> + Display,
{
    match result {
        Ok(value) => {
            tx.commit().await?;

            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(%error, %rollback_error, "rollback failed");
            }

            Err(error)
        }
    }
}
