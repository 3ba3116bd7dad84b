//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::products::models::ProductUuid;

use crate::{
    carts::{
        errors::into_status_error,
        views::{self, CartResponse},
    },
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;

    let cart = state
        .app
        .carts
        .remove_item(
            buyer,
            depot.user(),
            ProductUuid::from_uuid(product.into_inner()),
        )
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    views::respond(&cart, state, depot.request_id())
}
