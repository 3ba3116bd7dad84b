//! In-memory store.
//!
//! Transactions are serialised: [`MemoryStore::begin`] waits for exclusive
//! access to the state and works on a private copy of it. Committing swaps the
//! copy in; rolling back or dropping the transaction throws it away.

use std::{collections::HashMap, collections::HashSet, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    domain::{
        buyers::{BuyerId, UserId},
        carts::{
            models::{Cart, CartLine, CartTotals, CartUuid, LineProduct},
            repository::CartsRepository,
        },
        orders::{
            models::{NewOrder, Order, OrderCode},
            repository::{OrderFilter, OrdersRepository},
        },
        products::{
            models::{NewProduct, Product, ProductUuid},
            repository::ProductsRepository,
        },
    },
    storage::{HealthCheck, Store, StoreError, StoreTx},
};

/// A storage step that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Decrementing stock of this product.
    DecrementStock(ProductUuid),

    CreateOrder,
    SaveCart,

    /// Checking whether an order code is taken.
    CodeLookup,
}

/// Everything the in-memory store holds.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub products: HashMap<ProductUuid, Product>,
    pub carts: HashMap<CartUuid, StoredCart>,

    /// In insertion order.
    pub orders: Vec<Order>,
}

/// A cart as stored: lines reference products by id only.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCart {
    pub uuid: CartUuid,
    pub buyer_id: BuyerId,
    pub user_id: Option<UserId>,
    pub lines: Vec<(ProductUuid, u32)>,
    pub totals: CartTotals,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    faults: Arc<Mutex<HashSet<Fault>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fault` fail in every transaction begun from now on.
    pub async fn inject(&self, fault: Fault) {
        self.faults.lock().await.insert(fault);
    }

    pub async fn clear_faults(&self) {
        self.faults.lock().await.clear();
    }

    /// A copy of the committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let faults = self.faults.lock().await.clone();
        let committed = Arc::clone(&self.state).lock_owned().await;
        let working = committed.clone();

        Ok(MemoryTx {
            committed,
            working,
            faults,
        })
    }
}

#[derive(Debug)]
pub struct MemoryTx {
    committed: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    faults: HashSet<Fault>,
}

impl MemoryTx {
    fn check(&self, fault: &Fault) -> Result<(), StoreError> {
        if self.faults.contains(fault) {
            return Err(StoreError::Unavailable(format!("injected fault: {fault:?}")));
        }

        Ok(())
    }

    /// Join a stored cart with the current product data.
    fn hydrate(&self, stored: &StoredCart) -> Cart {
        let lines = stored
            .lines
            .iter()
            .filter_map(|(product, quantity)| {
                self.working.products.get(product).map(|product| CartLine {
                    product: LineProduct::from(product.clone()),
                    quantity: *quantity,
                })
            })
            .collect();

        Cart {
            uuid: stored.uuid,
            buyer_id: stored.buyer_id.clone(),
            user_id: stored.user_id,
            lines,
            totals: stored.totals,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn find_cart(&self, matches: impl Fn(&StoredCart) -> bool) -> Option<Cart> {
        self.working
            .carts
            .values()
            .find(|cart| matches(cart))
            .map(|cart| self.hydrate(cart))
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(mut self) -> Result<(), StoreError> {
        *self.committed = self.working;

        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CartsRepository for MemoryTx {
    async fn find_cart_by_user(&mut self, user: UserId) -> Result<Option<Cart>, StoreError> {
        Ok(self.find_cart(|cart| cart.user_id == Some(user)))
    }

    async fn find_cart_by_buyer(&mut self, buyer: &BuyerId) -> Result<Option<Cart>, StoreError> {
        Ok(self.find_cart(|cart| cart.user_id.is_none() && &cart.buyer_id == buyer))
    }

    async fn save_cart(&mut self, cart: &Cart) -> Result<(), StoreError> {
        self.check(&Fault::SaveCart)?;

        let duplicate = self.working.carts.values().any(|other| {
            other.uuid != cart.uuid
                && match cart.user_id {
                    Some(user) => other.user_id == Some(user),
                    None => other.user_id.is_none() && other.buyer_id == cart.buyer_id,
                }
        });

        if duplicate {
            return Err(StoreError::Conflict);
        }

        if cart
            .lines
            .iter()
            .any(|line| !self.working.products.contains_key(&line.product.uuid))
        {
            return Err(StoreError::InvalidReference);
        }

        self.working.carts.insert(
            cart.uuid,
            StoredCart {
                uuid: cart.uuid,
                buyer_id: cart.buyer_id.clone(),
                user_id: cart.user_id,
                lines: cart
                    .lines
                    .iter()
                    .map(|line| (line.product.uuid, line.quantity))
                    .collect(),
                totals: cart.totals,
                created_at: cart.created_at,
                updated_at: cart.updated_at,
            },
        );

        Ok(())
    }

    async fn delete_cart(&mut self, cart: CartUuid) -> Result<(), StoreError> {
        self.working
            .carts
            .remove(&cart)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ProductsRepository for MemoryTx {
    async fn list_products(&mut self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.working.products.values().cloned().collect();

        products.sort_by_key(|product| (product.created_at, product.uuid));

        Ok(products)
    }

    async fn get_product(&mut self, product: ProductUuid) -> Result<Option<Product>, StoreError> {
        Ok(self.working.products.get(&product).cloned())
    }

    async fn get_stock(&mut self, product: ProductUuid) -> Result<Option<u32>, StoreError> {
        Ok(self
            .working
            .products
            .get(&product)
            .map(|product| product.stock))
    }

    async fn create_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError> {
        if self.working.products.contains_key(&uuid) {
            return Err(StoreError::Conflict);
        }

        let now = Timestamp::now();
        let created = Product {
            uuid,
            title: product.title.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            discount: product.discount,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };

        self.working.products.insert(uuid, created.clone());

        Ok(created)
    }

    async fn update_product(
        &mut self,
        uuid: ProductUuid,
        product: &NewProduct,
    ) -> Result<Product, StoreError> {
        let existing = self
            .working
            .products
            .get_mut(&uuid)
            .ok_or(StoreError::NotFound)?;

        existing.title.clone_from(&product.title);
        existing.description.clone_from(&product.description);
        existing.image_url.clone_from(&product.image_url);
        existing.price = product.price;
        existing.discount = product.discount;
        existing.stock = product.stock;
        existing.updated_at = Timestamp::now();

        Ok(existing.clone())
    }

    async fn decrement_stock(
        &mut self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), StoreError> {
        self.check(&Fault::DecrementStock(product))?;

        let existing = self
            .working
            .products
            .get_mut(&product)
            .ok_or(StoreError::NotFound)?;

        existing.stock = existing
            .stock
            .checked_sub(quantity)
            .ok_or(StoreError::ConstraintViolation)?;
        existing.updated_at = Timestamp::now();

        Ok(())
    }
}

#[async_trait]
impl OrdersRepository for MemoryTx {
    async fn order_code_exists(&mut self, code: &OrderCode) -> Result<bool, StoreError> {
        self.check(&Fault::CodeLookup)?;

        Ok(self.working.orders.iter().any(|order| &order.code == code))
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        self.check(&Fault::CreateOrder)?;

        if self
            .working
            .orders
            .iter()
            .any(|existing| existing.code == order.code || existing.uuid == order.uuid)
        {
            return Err(StoreError::Conflict);
        }

        let now = Timestamp::now();
        let created = Order {
            uuid: order.uuid,
            code: order.code.clone(),
            user_id: order.user_id,
            subtotal: order.subtotal,
            total: order.total,
            items: order.items.clone(),
            created_at: now,
            updated_at: now,
        };

        self.working.orders.push(created.clone());

        Ok(created)
    }

    async fn get_order_by_code(&mut self, code: &OrderCode) -> Result<Option<Order>, StoreError> {
        Ok(self
            .working
            .orders
            .iter()
            .find(|order| &order.code == code)
            .cloned())
    }

    async fn list_orders(
        &mut self,
        filter: OrderFilter<'_>,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let needle = filter.search.map(str::to_lowercase);

        let mut matching: Vec<&Order> = self
            .working
            .orders
            .iter()
            .filter(|order| order.user_id == filter.user)
            .filter(|order| match &needle {
                None => true,
                Some(needle) => {
                    order.code.as_str().to_lowercase().contains(needle)
                        || order.items.iter().any(|item| {
                            item.title.to_lowercase().contains(needle)
                                || item.description.to_lowercase().contains(needle)
                        })
                }
            })
            .collect();

        matching.sort_by(|a, b| (b.created_at, b.uuid).cmp(&(a.created_at, a.uuid)));

        let total = matching.len() as u64;
        let offset = usize::try_from(filter.offset).unwrap_or(usize::MAX);

        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::helpers::new_product;

    use super::*;

    #[tokio::test]
    async fn rolled_back_writes_are_discarded() -> TestResult {
        let store = MemoryStore::new();
        let uuid = ProductUuid::new();

        let mut tx = store.begin().await?;
        tx.create_product(uuid, &new_product("Kettle", 100, 0, 1))
            .await?;
        tx.rollback().await?;

        assert!(store.snapshot().await.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn dropped_transactions_are_discarded() -> TestResult {
        let store = MemoryStore::new();

        {
            let mut tx = store.begin().await?;
            tx.create_product(ProductUuid::new(), &new_product("Kettle", 100, 0, 1))
                .await?;
        }

        assert!(store.snapshot().await.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn committed_writes_are_visible() -> TestResult {
        let store = MemoryStore::new();
        let uuid = ProductUuid::new();

        let mut tx = store.begin().await?;
        tx.create_product(uuid, &new_product("Kettle", 100, 0, 1))
            .await?;
        tx.commit().await?;

        let mut tx = store.begin().await?;

        assert_eq!(tx.get_stock(uuid).await?, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn stock_never_goes_negative() -> TestResult {
        let store = MemoryStore::new();
        let uuid = ProductUuid::new();

        let mut tx = store.begin().await?;
        tx.create_product(uuid, &new_product("Kettle", 100, 0, 1))
            .await?;

        let result = tx.decrement_stock(uuid, 2).await;

        assert!(
            matches!(result, Err(StoreError::ConstraintViolation)),
            "expected ConstraintViolation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn injected_faults_fail_the_step() -> TestResult {
        let store = MemoryStore::new();

        store.inject(Fault::CodeLookup).await;

        let mut tx = store.begin().await?;
        let result = tx.order_code_exists(&OrderCode::new("ORD-1")).await;

        assert!(
            matches!(result, Err(StoreError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }
}
