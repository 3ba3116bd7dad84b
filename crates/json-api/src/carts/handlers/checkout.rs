//! Checkout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{
        errors::into_status_error,
        views::{self, CartResponse},
    },
    extensions::*,
    state::State,
};

/// Checkout Handler
///
/// Reconciles the cart with current stock. Sold out lines are dropped and
/// quantities above what is available are lowered; the adjusted cart is
/// returned for the buyer to confirm.
#[endpoint(
    tags("cart"),
    summary = "Checkout Cart",
    responses(
        (status_code = StatusCode::OK, description = "Reconciled cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;

    let cart = state
        .app
        .carts
        .checkout(buyer, depot.user())
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    views::respond(&cart, state, depot.request_id())
}
