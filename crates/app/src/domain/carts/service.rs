//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    domain::{
        buyers::{BuyerId, UserId},
        carts::{
            errors::CartsServiceError,
            merge::merge_into,
            models::{Cart, CartTotals, LineProduct},
            pricing,
            repository::CartsRepository,
        },
        products::{models::ProductUuid, repository::ProductsRepository},
    },
    storage::{Store, StoreTx, finish},
    validation::{validate_new_quantity, validate_quantity},
};

#[derive(Debug, Clone)]
pub struct StoreCartsService<S> {
    store: S,
}

impl<S: Store> StoreCartsService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: Store> CartsService for StoreCartsService<S> {
    #[tracing::instrument(name = "carts.get_or_create", skip(self), fields(buyer_id = %buyer))]
    async fn get_or_create_cart(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.store.begin().await?;

        let result = get_or_create(&mut tx, buyer, user).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.add_item", skip(self), fields(buyer_id = %buyer))]
    async fn add_item(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        validate_quantity(quantity)?;

        let mut tx = self.store.begin().await?;

        let result = add_item(&mut tx, buyer, user, product, quantity).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.remove_item", skip(self), fields(buyer_id = %buyer))]
    async fn remove_item(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.store.begin().await?;

        let result = remove_item(&mut tx, buyer, user, product).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.update_quantity", skip(self), fields(buyer_id = %buyer))]
    async fn update_quantity(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        validate_new_quantity(quantity)?;

        let mut tx = self.store.begin().await?;

        let result = update_quantity(&mut tx, buyer, user, product, quantity).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.clear", skip(self), fields(buyer_id = %buyer))]
    async fn clear_cart(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.store.begin().await?;

        let result = clear_cart(&mut tx, buyer, user).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.checkout", skip(self), fields(buyer_id = %buyer))]
    async fn checkout(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.store.begin().await?;

        let result = checkout(&mut tx, buyer, user).await;

        finish(tx, result).await
    }

    #[tracing::instrument(name = "carts.associate", skip(self), fields(buyer_id = %buyer, user_id = %user))]
    async fn associate_with_user(
        &self,
        buyer: &BuyerId,
        user: UserId,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.store.begin().await?;

        let result = associate_with_user(&mut tx, buyer, user).await;

        finish(tx, result).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The buyer's current cart.
    ///
    /// The user's cart is preferred, then the buyer's anonymous cart. When
    /// neither exists an authenticated user gets a new persisted cart and an
    /// anonymous buyer gets an empty cart that is not saved.
    async fn get_or_create_cart(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a product, merging with an existing line.
    async fn add_item(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    async fn remove_item(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Overwrite a line's quantity; zero removes the line.
    async fn update_quantity(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    async fn clear_cart(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError>;

    /// Reconcile the cart against live stock before an order is placed.
    ///
    /// Lines whose product is gone or sold out are dropped and quantities
    /// above the available stock are lowered to it. No order is created.
    async fn checkout(
        &self,
        buyer: &BuyerId,
        user: Option<UserId>,
    ) -> Result<Cart, CartsServiceError>;

    /// Fold the buyer's anonymous cart into the user's cart.
    async fn associate_with_user(
        &self,
        buyer: &BuyerId,
        user: UserId,
    ) -> Result<(), CartsServiceError>;
}

/// Loads the cart as last saved, with the totals stored at that save.
async fn find_stored_cart<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Option<Cart>, CartsServiceError> {
    if let Some(user) = user
        && let Some(cart) = tx.find_cart_by_user(user).await?
    {
        return Ok(Some(cart));
    }

    Ok(tx.find_cart_by_buyer(buyer).await?)
}

/// Loads the cart with totals priced against the current catalog.
async fn find_cart<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Option<Cart>, CartsServiceError> {
    let Some(mut cart) = find_stored_cart(tx, buyer, user).await? else {
        return Ok(None);
    };

    cart.totals = pricing::recalculate(&cart.lines)?;

    Ok(Some(cart))
}

async fn require_cart<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Cart, CartsServiceError> {
    find_cart(tx, buyer, user)
        .await?
        .ok_or(CartsServiceError::CartNotFound)
}

async fn save<Tx: StoreTx>(
    tx: &mut Tx,
    cart: &mut Cart,
    before: CartTotals,
    action: &'static str,
) -> Result<(), CartsServiceError> {
    let after = cart.recalculate()?;

    tx.save_cart(cart).await?;

    info!(
        cart_uuid = %cart.uuid,
        action,
        before_total = before.total,
        after_total = after.total,
        before_items = before.unique_item_count,
        after_items = after.unique_item_count,
        "saved cart"
    );

    Ok(())
}

async fn get_or_create<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Cart, CartsServiceError> {
    if let Some(cart) = find_cart(tx, buyer, user).await? {
        return Ok(cart);
    }

    let cart = Cart::new(buyer.clone(), user);

    if user.is_some() {
        tx.save_cart(&cart).await?;

        info!(cart_uuid = %cart.uuid, "created cart");
    }

    Ok(cart)
}

async fn add_item<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
    product: ProductUuid,
    quantity: u32,
) -> Result<Cart, CartsServiceError> {
    let product = tx
        .get_product(product)
        .await?
        .ok_or(CartsServiceError::ProductNotFound)?;

    if product.stock < quantity {
        return Err(CartsServiceError::InsufficientStock {
            product: product.uuid,
            available: product.stock,
            requested: quantity,
        });
    }

    let mut cart = match find_cart(tx, buyer, user).await? {
        Some(cart) => cart,
        None => Cart::new(buyer.clone(), user),
    };

    let existing = cart.line(product.uuid).map_or(0, |line| line.quantity);
    let combined = existing.saturating_add(quantity);

    if combined > product.stock {
        return Err(CartsServiceError::InsufficientStock {
            product: product.uuid,
            available: product.stock,
            requested: combined,
        });
    }

    let before = cart.totals;

    cart.add(LineProduct::from(product), quantity);

    save(tx, &mut cart, before, "add_item").await?;

    Ok(cart)
}

async fn remove_item<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
    product: ProductUuid,
) -> Result<Cart, CartsServiceError> {
    let mut cart = require_cart(tx, buyer, user).await?;
    let before = cart.totals;

    if !cart.remove(product) {
        return Err(CartsServiceError::LineNotFound);
    }

    save(tx, &mut cart, before, "remove_item").await?;

    Ok(cart)
}

async fn update_quantity<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
    product: ProductUuid,
    quantity: u32,
) -> Result<Cart, CartsServiceError> {
    let mut cart = require_cart(tx, buyer, user).await?;
    let before = cart.totals;

    if quantity == 0 {
        if !cart.remove(product) {
            return Err(CartsServiceError::LineNotFound);
        }

        save(tx, &mut cart, before, "remove_item").await?;

        return Ok(cart);
    }

    let product = tx
        .get_product(product)
        .await?
        .ok_or(CartsServiceError::ProductNotFound)?;

    if cart.line(product.uuid).is_none() {
        return Err(CartsServiceError::LineNotFound);
    }

    if product.stock < quantity {
        return Err(CartsServiceError::InsufficientStock {
            product: product.uuid,
            available: product.stock,
            requested: quantity,
        });
    }

    cart.set_quantity(product.uuid, quantity);

    save(tx, &mut cart, before, "update_quantity").await?;

    Ok(cart)
}

async fn clear_cart<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Cart, CartsServiceError> {
    let mut cart = require_cart(tx, buyer, user).await?;
    let before = cart.totals;

    cart.clear();

    save(tx, &mut cart, before, "clear").await?;

    Ok(cart)
}

async fn checkout<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: Option<UserId>,
) -> Result<Cart, CartsServiceError> {
    let mut cart = find_stored_cart(tx, buyer, user)
        .await?
        .ok_or(CartsServiceError::CartNotFound)?;

    if cart.is_empty() {
        return Err(CartsServiceError::EmptyCart);
    }

    let before = cart.totals;
    let mut changed = false;
    let mut lines = Vec::with_capacity(cart.lines.len());

    for mut line in std::mem::take(&mut cart.lines) {
        let stock = tx.get_stock(line.product.uuid).await?.unwrap_or(0);

        if stock == 0 {
            warn!(product_uuid = %line.product.uuid, "dropping sold out product from cart");
            changed = true;
            continue;
        }

        if stock < line.quantity {
            warn!(
                product_uuid = %line.product.uuid,
                requested = line.quantity,
                available = stock,
                "lowering quantity to available stock"
            );
            line.quantity = stock;
            changed = true;
        }

        line.product.stock = stock;
        lines.push(line);
    }

    cart.lines = lines;

    let live = pricing::recalculate(&cart.lines)?;

    if changed || live != before {
        if !changed {
            info!(
                cart_uuid = %cart.uuid,
                stored_total = before.total,
                live_total = live.total,
                "catalog prices changed since the cart was saved"
            );
        }

        save(tx, &mut cart, before, "checkout").await?;
    }

    Ok(cart)
}

async fn associate_with_user<Tx: StoreTx>(
    tx: &mut Tx,
    buyer: &BuyerId,
    user: UserId,
) -> Result<(), CartsServiceError> {
    let Some(mut anonymous) = tx.find_cart_by_buyer(buyer).await? else {
        return Ok(());
    };

    let Some(mut target) = tx.find_cart_by_user(user).await? else {
        anonymous.user_id = Some(user);
        tx.save_cart(&anonymous).await?;

        info!(cart_uuid = %anonymous.uuid, "assigned anonymous cart to user");

        return Ok(());
    };

    let source_uuid = anonymous.uuid;
    let before = target.totals;

    merge_into(&mut target, anonymous);

    save(tx, &mut target, before, "merge").await?;
    tx.delete_cart(source_uuid).await?;

    info!(cart_uuid = %target.uuid, merged_cart_uuid = %source_uuid, "merged anonymous cart");

    Ok(())
}
