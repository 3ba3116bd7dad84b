//! Cart views.

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::{
    CartsServiceError,
    models::{Cart, CartLine},
    pricing::{self, PricingError},
};

use crate::{carts::errors::into_status_error, money::format_minor, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Buyer token the cart belongs to
    pub buyer_id: String,

    /// Owning account, when signed in
    pub user_id: Option<i64>,

    pub items: Vec<CartItemResponse>,

    /// Formatted total before discounts
    pub subtotal: String,

    /// Formatted total after discounts
    pub total: String,

    /// Number of distinct products
    pub unique_item_count: u32,

    /// Formatted amount saved through discounts
    pub total_saved: String,
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_uuid: Uuid,
    pub title: String,

    /// Product image, or the store placeholder
    pub image_url: String,

    /// Formatted unit price before discount
    pub unit_price: String,

    pub quantity: u32,

    /// Percentage off the unit price
    pub discount: i32,

    /// Whether the product is running out
    pub low_stock: bool,

    pub subtotal: String,
    pub total: String,
}

impl CartResponse {
    /// Build the view, formatting amounts in the store currency.
    ///
    /// # Errors
    ///
    /// Returns an error if a line's amounts cannot be computed.
    pub(crate) fn build(cart: &Cart, state: &State) -> Result<Self, PricingError> {
        let items = cart
            .lines
            .iter()
            .map(|line| CartItemResponse::build(line, state))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            buyer_id: cart.buyer_id.to_string(),
            user_id: cart.user_id.map(|user| user.get()),
            items,
            subtotal: format_minor(cart.totals.subtotal, state.currency),
            total: format_minor(cart.totals.total, state.currency),
            unique_item_count: cart.totals.unique_item_count,
            total_saved: format_minor(cart.totals.total_saved, state.currency),
        })
    }
}

impl CartItemResponse {
    fn build(line: &CartLine, state: &State) -> Result<Self, PricingError> {
        let amounts = pricing::line_amounts(line)?;
        let settings = &state.app.settings;

        Ok(Self {
            product_uuid: line.product.uuid.into_uuid(),
            title: line.product.title.clone(),
            image_url: line
                .product
                .image_url
                .clone()
                .unwrap_or_else(|| settings.default_image_url.clone()),
            unit_price: format_minor(line.product.price, state.currency),
            quantity: line.quantity,
            discount: line.product.discount,
            low_stock: line.product.stock <= settings.low_stock_threshold,
            subtotal: format_minor(amounts.subtotal, state.currency),
            total: format_minor(amounts.total, state.currency),
        })
    }
}

/// Render a cart, mapping view failures like service failures.
pub(crate) fn respond(
    cart: &Cart,
    state: &State,
    request_id: Option<&str>,
) -> Result<Json<CartResponse>, StatusError> {
    CartResponse::build(cart, state)
        .map(Json)
        .map_err(|error| into_status_error(&CartsServiceError::Inconsistent(error), request_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::tz::TimeZone;
    use rusty_money::iso;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext, domain::products::models::ProductUuid, settings::StoreSettings,
    };

    use crate::test_helpers::make_cart;

    use super::*;

    fn state() -> State {
        State {
            app: AppContext::in_memory(StoreSettings::default()),
            currency: iso::USD,
            time_zone: TimeZone::UTC,
        }
    }

    #[test]
    fn amounts_are_formatted_per_line_and_in_total() -> TestResult {
        let cart = make_cart(ProductUuid::new(), 2);

        let view = CartResponse::build(&cart, &state())?;
        let item = view.items.first().ok_or("missing item")?;

        assert_eq!(item.unit_price, "$30.00");
        assert_eq!(item.subtotal, "$60.00");
        assert_eq!(item.total, "$51.00");
        assert_eq!(view.total, "$51.00");
        assert_eq!(view.total_saved, "$9.00");
        assert_eq!(view.unique_item_count, 1);

        Ok(())
    }

    #[test]
    fn missing_image_falls_back_to_placeholder() -> TestResult {
        let cart = make_cart(ProductUuid::new(), 1);
        let state = state();

        let view = CartResponse::build(&cart, &state)?;
        let item = view.items.first().ok_or("missing item")?;

        assert_eq!(item.image_url, state.app.settings.default_image_url);

        Ok(())
    }

    #[test]
    fn low_stock_follows_threshold() -> TestResult {
        let cart = make_cart(ProductUuid::new(), 1);

        let mut settings = StoreSettings::default();
        settings.low_stock_threshold = 2;

        let tight = State {
            app: AppContext {
                settings: Arc::new(settings),
                ..AppContext::in_memory(StoreSettings::default())
            },
            ..state()
        };

        let view = CartResponse::build(&cart, &tight)?;
        let item = view.items.first().ok_or("missing item")?;

        assert!(!item.low_stock, "stock of 3 is above a threshold of 2");

        let view = CartResponse::build(&cart, &state())?;
        let item = view.items.first().ok_or("missing item")?;

        assert!(item.low_stock, "stock of 3 is within the default threshold");

        Ok(())
    }
}
