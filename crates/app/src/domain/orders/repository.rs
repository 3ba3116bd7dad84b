//! Orders Repository

use std::collections::HashMap;

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{PgTx, count_param, try_get_count},
    domain::{
        buyers::UserId,
        orders::models::{NewOrder, Order, OrderCode, OrderItem, OrderUuid},
        products::models::ProductUuid,
    },
    storage::StoreError,
};

const ORDER_CODE_EXISTS_SQL: &str = include_str!("sql/order_code_exists.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_BY_CODE_SQL: &str = include_str!("sql/get_order_by_code.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");

/// Filter for a user's order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter<'a> {
    pub user: UserId,
    pub search: Option<&'a str>,
    pub limit: u32,
    pub offset: u64,
}

/// Order persistence available inside a transaction.
#[async_trait]
pub trait OrdersRepository: Send {
    async fn order_code_exists(&mut self, code: &OrderCode) -> Result<bool, StoreError>;

    /// Insert the order and its items.
    ///
    /// Fails with [`StoreError::Conflict`] when the code is already taken.
    async fn create_order(&mut self, order: &NewOrder) -> Result<Order, StoreError>;

    async fn get_order_by_code(&mut self, code: &OrderCode) -> Result<Option<Order>, StoreError>;

    /// One page of matching orders, newest first, and the total match count.
    async fn list_orders(
        &mut self,
        filter: OrderFilter<'_>,
    ) -> Result<(Vec<Order>, u64), StoreError>;
}

#[async_trait]
impl OrdersRepository for PgTx {
    async fn order_code_exists(&mut self, code: &OrderCode) -> Result<bool, StoreError> {
        Ok(query_scalar(ORDER_CODE_EXISTS_SQL)
            .bind(code.as_str())
            .fetch_one(&mut *self.tx)
            .await?)
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.code.as_str())
            .bind(order.user_id.get())
            .bind(order.subtotal)
            .bind(order.total)
            .fetch_one(&mut *self.tx)
            .await?;

        let quantities = order
            .items
            .iter()
            .map(|item| count_param(item.quantity, "quantity"))
            .collect::<Result<Vec<i32>, _>>()?;

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.uuid.into_uuid())
            .bind(
                order
                    .items
                    .iter()
                    .map(|item| item.product_uuid.into_uuid())
                    .collect::<Vec<Uuid>>(),
            )
            .bind(
                order
                    .items
                    .iter()
                    .map(|item| item.title.clone())
                    .collect::<Vec<String>>(),
            )
            .bind(
                order
                    .items
                    .iter()
                    .map(|item| item.description.clone())
                    .collect::<Vec<String>>(),
            )
            .bind(
                order
                    .items
                    .iter()
                    .map(|item| item.image_url.clone())
                    .collect::<Vec<Option<String>>>(),
            )
            .bind(order.items.iter().map(|item| item.price).collect::<Vec<i64>>())
            .bind(
                order
                    .items
                    .iter()
                    .map(|item| item.discount)
                    .collect::<Vec<i32>>(),
            )
            .bind(quantities)
            .execute(&mut *self.tx)
            .await?;

        created.items.clone_from(&order.items);

        Ok(created)
    }

    async fn get_order_by_code(&mut self, code: &OrderCode) -> Result<Option<Order>, StoreError> {
        let Some(order) = query_as::<Postgres, Order>(GET_ORDER_BY_CODE_SQL)
            .bind(code.as_str())
            .fetch_optional(&mut *self.tx)
            .await?
        else {
            return Ok(None);
        };

        let mut orders = self.with_items(vec![order]).await?;

        Ok(orders.pop())
    }

    async fn list_orders(
        &mut self,
        filter: OrderFilter<'_>,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let search = filter.search.map(escape_like);

        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(filter.user.get())
            .bind(search.as_deref())
            .fetch_one(&mut *self.tx)
            .await?;

        let offset =
            i64::try_from(filter.offset).map_err(|_overflow| StoreError::OutOfRange("offset"))?;

        let orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(filter.user.get())
            .bind(search.as_deref())
            .bind(i64::from(filter.limit))
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await?;

        let orders = self.with_items(orders).await?;
        let total = u64::try_from(total).map_err(|_negative| StoreError::OutOfRange("count"))?;

        Ok((orders, total))
    }
}

impl PgTx {
    async fn with_items(&mut self, mut orders: Vec<Order>) -> Result<Vec<Order>, StoreError> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let rows = query(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut *self.tx)
            .await?;

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();

        for row in &rows {
            let order_uuid: Uuid = row.try_get("order_uuid")?;

            items
                .entry(order_uuid)
                .or_default()
                .push(OrderItem::from_row(row)?);
        }

        for order in &mut orders {
            if let Some(order_items) = items.remove(&order.uuid.into_uuid()) {
                order.items = order_items;
            }
        }

        Ok(orders)
    }
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());

    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            code: OrderCode::new(row.try_get::<String, _>("code")?),
            user_id: UserId::new(row.try_get("user_id")?),
            subtotal: row.try_get("subtotal")?,
            total: row.try_get("total")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("mug"), "mug");
    }
}
