//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{
        buyers::{BuyerId, UserId},
        carts::pricing::{self, PricingError},
        products::models::{Product, ProductUuid},
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
///
/// Totals are derived from the lines by [`Cart::recalculate`] and stored
/// alongside them; they are only trustworthy straight after a recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub buyer_id: BuyerId,
    pub user_id: Option<UserId>,
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Derived cart totals, all in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of unit price times quantity, before discounts.
    pub subtotal: i64,

    /// Sum of the per-line discounted amounts.
    pub total: i64,

    /// Number of distinct products, not the sum of quantities.
    pub unique_item_count: u32,

    pub total_saved: i64,
}

/// One product in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: LineProduct,
    pub quantity: u32,
}

/// Live catalog data read together with a cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub stock: u32,
}

impl From<Product> for LineProduct {
    fn from(product: Product) -> Self {
        Self {
            uuid: product.uuid,
            title: product.title,
            description: product.description,
            image_url: product.image_url,
            price: product.price,
            discount: product.discount,
            stock: product.stock,
        }
    }
}

impl Cart {
    /// An empty, not yet persisted cart.
    #[must_use]
    pub fn new(buyer_id: BuyerId, user_id: Option<UserId>) -> Self {
        let now = Timestamp::now();

        Self {
            uuid: CartUuid::new(),
            buyer_id,
            user_id,
            lines: Vec::new(),
            totals: CartTotals::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, product: ProductUuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.uuid == product)
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// The product data on an existing line is refreshed from `product`.
    pub fn add(&mut self, product: LineProduct, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.uuid == product.uuid)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            line.product = product;
        } else {
            self.lines.push(CartLine { product, quantity });
        }
    }

    /// Overwrite the quantity of an existing line. Zero removes it.
    ///
    /// Returns `false` when the product is not in the cart.
    pub fn set_quantity(&mut self, product: ProductUuid, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product);
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product.uuid == product)
        {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when the product is not in the cart.
    pub fn remove(&mut self, product: ProductUuid) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product.uuid != product);

        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Re-derive the totals from the current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] when a line is invalid or the totals come out
    /// inconsistent; the stored totals are left untouched in that case.
    pub fn recalculate(&mut self) -> Result<CartTotals, PricingError> {
        let totals = pricing::recalculate(&self.lines)?;

        self.totals = totals;
        self.updated_at = Timestamp::now();

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use crate::test::helpers::line_product;

    use super::*;

    fn cart() -> Cart {
        Cart::new(BuyerId::new("buyer"), None)
    }

    #[test]
    fn adding_same_product_twice_merges_lines() {
        let mut cart = cart();
        let product = line_product(1_000, 0, 10);

        cart.add(product.clone(), 2);
        cart.add(product.clone(), 3);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.line(product.uuid).map(|l| l.quantity), Some(5));
    }

    #[test]
    fn setting_zero_quantity_removes_line() {
        let mut cart = cart();
        let product = line_product(1_000, 0, 10);

        cart.add(product.clone(), 2);

        assert!(cart.set_quantity(product.uuid, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn setting_quantity_of_missing_line_reports_false() {
        let mut cart = cart();

        assert!(!cart.set_quantity(ProductUuid::new(), 3));
        assert!(!cart.remove(ProductUuid::new()));
    }

    #[test]
    fn recalculate_stores_totals() -> Result<(), PricingError> {
        let mut cart = cart();

        cart.add(line_product(1_000, 15, 10), 3);

        let totals = cart.recalculate()?;

        assert_eq!(cart.totals, totals);
        assert_eq!(totals.subtotal, 3_000);
        assert_eq!(totals.total, 2_550);

        Ok(())
    }

    #[test]
    fn failed_recalculation_keeps_previous_totals() -> Result<(), PricingError> {
        let mut cart = cart();

        cart.add(line_product(1_000, 0, 10), 1);
        cart.recalculate()?;

        cart.add(line_product(-1, 0, 10), 1);

        assert!(cart.recalculate().is_err());
        assert_eq!(cart.totals.subtotal, 1_000);

        Ok(())
    }
}
