//! Carts Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{PgTx, count_param, try_get_count},
    domain::{
        buyers::{BuyerId, UserId},
        carts::models::{Cart, CartLine, CartTotals, CartUuid, LineProduct},
        products::models::ProductUuid,
    },
    storage::StoreError,
};

const FIND_CART_BY_USER_SQL: &str = include_str!("sql/find_cart_by_user.sql");
const FIND_CART_BY_BUYER_SQL: &str = include_str!("sql/find_cart_by_buyer.sql");
const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");
const UPSERT_CART_SQL: &str = include_str!("sql/upsert_cart.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("sql/delete_cart_items.sql");
const INSERT_CART_ITEMS_SQL: &str = include_str!("sql/insert_cart_items.sql");
const DELETE_CART_SQL: &str = include_str!("sql/delete_cart.sql");

/// Cart persistence available inside a transaction.
///
/// Carts are always loaded with their lines and the live product data of each
/// line, and saved as a whole aggregate.
#[async_trait]
pub trait CartsRepository: Send {
    /// The cart owned by `user`, locked until the transaction ends.
    async fn find_cart_by_user(&mut self, user: UserId) -> Result<Option<Cart>, StoreError>;

    /// The anonymous cart of `buyer`, locked until the transaction ends.
    async fn find_cart_by_buyer(&mut self, buyer: &BuyerId) -> Result<Option<Cart>, StoreError>;

    /// Insert or overwrite the cart, replacing all of its lines.
    async fn save_cart(&mut self, cart: &Cart) -> Result<(), StoreError>;

    async fn delete_cart(&mut self, cart: CartUuid) -> Result<(), StoreError>;
}

#[async_trait]
impl CartsRepository for PgTx {
    async fn find_cart_by_user(&mut self, user: UserId) -> Result<Option<Cart>, StoreError> {
        let cart = query_as::<Postgres, Cart>(FIND_CART_BY_USER_SQL)
            .bind(user.get())
            .fetch_optional(&mut *self.tx)
            .await?;

        self.with_lines(cart).await
    }

    async fn find_cart_by_buyer(&mut self, buyer: &BuyerId) -> Result<Option<Cart>, StoreError> {
        let cart = query_as::<Postgres, Cart>(FIND_CART_BY_BUYER_SQL)
            .bind(buyer.as_str())
            .fetch_optional(&mut *self.tx)
            .await?;

        self.with_lines(cart).await
    }

    async fn save_cart(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let uuid = cart.uuid.into_uuid();

        query(UPSERT_CART_SQL)
            .bind(uuid)
            .bind(cart.buyer_id.as_str())
            .bind(cart.user_id.map(UserId::get))
            .bind(cart.totals.subtotal)
            .bind(cart.totals.total)
            .bind(count_param(cart.totals.unique_item_count, "unique_item_count")?)
            .bind(cart.totals.total_saved)
            .bind(SqlxTimestamp::from(cart.created_at))
            .bind(SqlxTimestamp::from(cart.updated_at))
            .execute(&mut *self.tx)
            .await?;

        query(DELETE_CART_ITEMS_SQL)
            .bind(uuid)
            .execute(&mut *self.tx)
            .await?;

        if cart.lines.is_empty() {
            return Ok(());
        }

        let products: Vec<Uuid> = cart
            .lines
            .iter()
            .map(|line| line.product.uuid.into_uuid())
            .collect();

        let quantities = cart
            .lines
            .iter()
            .map(|line| count_param(line.quantity, "quantity"))
            .collect::<Result<Vec<i32>, _>>()?;

        query(INSERT_CART_ITEMS_SQL)
            .bind(uuid)
            .bind(products)
            .bind(quantities)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn delete_cart(&mut self, cart: CartUuid) -> Result<(), StoreError> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

impl PgTx {
    async fn with_lines(&mut self, cart: Option<Cart>) -> Result<Option<Cart>, StoreError> {
        let Some(mut cart) = cart else {
            return Ok(None);
        };

        let lines = query_as::<Postgres, CartLine>(GET_CART_LINES_SQL)
            .bind(cart.uuid.into_uuid())
            .fetch_all(&mut *self.tx)
            .await?;

        cart.lines.extend(lines);

        Ok(Some(cart))
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unique_item_count = try_get_count(row, "unique_item_count")?;

        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            buyer_id: BuyerId::new(row.try_get::<String, _>("buyer_id")?),
            user_id: row.try_get::<Option<i64>, _>("user_id")?.map(UserId::new),
            lines: Vec::with_capacity(unique_item_count as usize),
            totals: CartTotals {
                subtotal: row.try_get("subtotal")?,
                total: row.try_get("total")?,
                unique_item_count,
                total_saved: row.try_get("total_saved")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product: LineProduct {
                uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                image_url: row.try_get("image_url")?,
                price: row.try_get("price")?,
                discount: row.try_get("discount")?,
                stock: try_get_count(row, "stock")?,
            },
            quantity: try_get_count(row, "quantity")?,
        })
    }
}
