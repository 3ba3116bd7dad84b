//! Products Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{PgTx, count_param, try_get_count},
    domain::products::models::{NewProduct, Product, ProductUuid},
    storage::StoreError,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

/// Product lookup and stock operations available inside a transaction.
#[async_trait]
pub trait ProductsRepository: Send {
    async fn list_products(&mut self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&mut self, product: ProductUuid) -> Result<Option<Product>, StoreError>;

    /// Current stock, read with a row lock so it stays valid until commit.
    async fn get_stock(&mut self, product: ProductUuid) -> Result<Option<u32>, StoreError>;

    async fn create_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError>;

    async fn update_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError>;

    /// Take `quantity` units out of stock.
    ///
    /// Fails with [`StoreError::ConstraintViolation`] rather than going negative.
    async fn decrement_stock(
        &mut self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl ProductsRepository for PgTx {
    async fn list_products(&mut self) -> Result<Vec<Product>, StoreError> {
        Ok(query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut *self.tx)
            .await?)
    }

    async fn get_product(&mut self, product: ProductUuid) -> Result<Option<Product>, StoreError> {
        Ok(query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut *self.tx)
            .await?)
    }

    async fn get_stock(&mut self, product: ProductUuid) -> Result<Option<u32>, StoreError> {
        let stock: Option<i32> = query_scalar(GET_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;

        stock
            .map(|stock| u32::try_from(stock).map_err(|_negative| StoreError::OutOfRange("stock")))
            .transpose()
    }

    async fn create_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError> {
        Ok(query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(uuid.into_uuid())
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.image_url.as_deref())
            .bind(product.price)
            .bind(product.discount)
            .bind(count_param(product.stock, "stock")?)
            .fetch_one(&mut *self.tx)
            .await?)
    }

    async fn update_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError> {
        Ok(query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(uuid.into_uuid())
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.image_url.as_deref())
            .bind(product.price)
            .bind(product.discount)
            .bind(count_param(product.stock, "stock")?)
            .fetch_one(&mut *self.tx)
            .await?)
    }

    async fn decrement_stock(
        &mut self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(count_param(quantity, "quantity")?)
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
            stock: try_get_count(row, "stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
