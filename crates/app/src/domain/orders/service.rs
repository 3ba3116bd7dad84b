//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, debug, info};

use crate::{
    domain::{
        buyers::UserId,
        carts::{pricing, repository::CartsRepository},
        orders::{
            codes::OrderCodeGenerator,
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderCode, OrderItem, OrderQuery, OrderUuid, Page},
            repository::{OrderFilter, OrdersRepository},
        },
        products::repository::ProductsRepository,
    },
    settings::StoreSettings,
    storage::{Store, StoreTx, finish},
    validation::validate_order_query,
};

#[derive(Debug, Clone)]
pub struct StoreOrdersService<S> {
    store: S,
    settings: Arc<StoreSettings>,
    codes: OrderCodeGenerator,
}

impl<S: Store> StoreOrdersService<S> {
    #[must_use]
    pub fn new(store: S, settings: Arc<StoreSettings>) -> Self {
        Self {
            store,
            settings,
            codes: OrderCodeGenerator::default(),
        }
    }

    /// Replace the order code source.
    #[must_use]
    pub fn with_codes(mut self, codes: OrderCodeGenerator) -> Self {
        self.codes = codes;
        self
    }

    async fn place_order(
        &self,
        tx: &mut S::Tx,
        user: UserId,
    ) -> Result<OrderCode, OrdersServiceError> {
        let mut cart = tx
            .find_cart_by_user(user)
            .await?
            .ok_or(OrdersServiceError::CartNotFound)?;

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let totals = pricing::recalculate(&cart.lines)?;
        let code = self.allocate_code(tx).await?;

        Span::current().record("order_code", tracing::field::display(&code));

        let order = NewOrder {
            uuid: OrderUuid::new(),
            code: code.clone(),
            user_id: user,
            subtotal: totals.subtotal,
            total: totals.total,
            items: cart.lines.iter().map(OrderItem::from).collect(),
        };

        tx.create_order(&order).await?;

        for line in &cart.lines {
            tx.decrement_stock(line.product.uuid, line.quantity).await?;
        }

        cart.clear();
        cart.recalculate()?;

        tx.save_cart(&cart).await?;

        info!(
            order_code = %code,
            cart_uuid = %cart.uuid,
            subtotal = totals.subtotal,
            total = totals.total,
            items = order.items.len(),
            "created order"
        );

        Ok(code)
    }

    async fn allocate_code(&self, tx: &mut S::Tx) -> Result<OrderCode, OrdersServiceError> {
        let attempts = self.settings.max_order_code_attempts;

        for attempt in 1..=attempts {
            let code = self.codes.next_code();

            if !tx.order_code_exists(&code).await? {
                return Ok(code);
            }

            debug!(order_code = %code, attempt, "order code taken, retrying");
        }

        Err(OrdersServiceError::CodeSpaceExhausted { attempts })
    }
}

#[async_trait]
impl<S: Store> OrdersService for StoreOrdersService<S> {
    #[tracing::instrument(
        name = "orders.create",
        skip(self),
        fields(user_id = %user, order_code = tracing::field::Empty)
    )]
    async fn create_order(&self, user: UserId) -> Result<OrderCode, OrdersServiceError> {
        let mut tx = self.store.begin().await?;

        let result = self.place_order(&mut tx, user).await;

        finish(tx, result).await
    }

    async fn get_order(&self, user: UserId, code: &OrderCode) -> Result<Order, OrdersServiceError> {
        let mut tx = self.store.begin().await?;

        let result = tx
            .get_order_by_code(code)
            .await
            .map_err(OrdersServiceError::from)
            .and_then(|order| {
                order
                    .filter(|order| order.user_id == user)
                    .ok_or(OrdersServiceError::OrderNotFound)
            });

        finish(tx, result).await
    }

    async fn list_orders(
        &self,
        user: UserId,
        query: OrderQuery,
    ) -> Result<Page<Order>, OrdersServiceError> {
        validate_order_query(&query, self.settings.max_page_size)?;

        let page_size = query.page_size.unwrap_or(self.settings.page_size);
        let offset = u64::from(query.page - 1) * u64::from(page_size);

        let mut tx = self.store.begin().await?;

        let result = tx
            .list_orders(OrderFilter {
                user,
                search: query.search_term(),
                limit: page_size,
                offset,
            })
            .await
            .map_err(OrdersServiceError::from);

        let (items, total) = finish(tx, result).await?;

        Ok(Page {
            items,
            page: query.page,
            page_size,
            total,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into an order.
    ///
    /// Runs in one transaction: the order is stored, stock is decremented for
    /// every line and the cart is emptied, or nothing changes at all.
    async fn create_order(&self, user: UserId) -> Result<OrderCode, OrdersServiceError>;

    /// A single order owned by `user`.
    async fn get_order(&self, user: UserId, code: &OrderCode) -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserId,
        query: OrderQuery,
    ) -> Result<Page<Order>, OrdersServiceError>;
}
