//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, StoreCartsService},
        orders::{OrdersService, StoreOrdersService},
        products::{ProductsService, StoreProductsService},
    },
    settings::StoreSettings,
    storage::{HealthCheck, MemoryStore, PgStore, Store},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub health: Arc<dyn HealthCheck>,
    pub settings: Arc<StoreSettings>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending
    /// migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating
    /// the schema fails.
    pub async fn from_database_url(
        url: &str,
        settings: StoreSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        info!("connected to postgres");

        Ok(Self::from_store(PgStore::new(Db::new(pool)), settings))
    }

    /// Build application context over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(settings: StoreSettings) -> Self {
        Self::from_store(MemoryStore::new(), settings)
    }

    fn from_store<S>(store: S, settings: StoreSettings) -> Self
    where
        S: Store + HealthCheck + Clone + 'static,
    {
        let settings = Arc::new(settings);

        Self {
            products: Arc::new(StoreProductsService::new(store.clone())),
            carts: Arc::new(StoreCartsService::new(store.clone())),
            orders: Arc::new(StoreOrdersService::new(store.clone(), Arc::clone(&settings))),
            health: Arc::new(store),
            settings,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
