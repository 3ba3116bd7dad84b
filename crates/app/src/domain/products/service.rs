//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
        repository::ProductsRepository,
    },
    storage::{Store, StoreTx},
    validation::validate_new_product,
};

#[derive(Debug, Clone)]
pub struct StoreProductsService<S> {
    store: S,
}

impl<S: Store> StoreProductsService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: Store> ProductsService for StoreProductsService<S> {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.store.begin().await?;

        let products = tx.list_products().await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.store.begin().await?;

        let product = tx
            .get_product(product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        uuid: ProductUuid,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        validate_new_product(&product)?;

        let mut tx = self.store.begin().await?;

        let created = tx.create_product(uuid, &product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, price = created.price, stock = created.stock, "created product");

        Ok(created)
    }

    async fn update_product(
        &self,
        uuid: ProductUuid,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        validate_new_product(&product)?;

        let mut tx = self.store.begin().await?;

        let updated = tx.update_product(uuid, &product).await?;

        tx.commit().await?;

        info!(product_uuid = %updated.uuid, price = updated.price, stock = updated.stock, "updated product");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product with the given UUID.
    async fn create_product(
        &self,
        uuid: ProductUuid,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError>;

    /// Replaces the product's details, price and stock.
    async fn update_product(
        &self,
        uuid: ProductUuid,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError>;
}
