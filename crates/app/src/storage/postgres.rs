//! Postgres-backed store.

use async_trait::async_trait;

use crate::{
    database::{Db, PgTx},
    storage::{HealthCheck, Store, StoreError, StoreTx},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    db: Db,
}

impl PgStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StoreError> {
        Ok(self.db.begin().await?)
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn check(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self) -> Result<(), StoreError> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(self.tx.rollback().await?)
    }
}
