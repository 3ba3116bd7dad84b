//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
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

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

/// Add Cart Item Handler
///
/// Adds to an existing line for the same product instead of creating a
/// second one.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or not enough stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .add_item(
            buyer,
            depot.user(),
            ProductUuid::from_uuid(request.product_uuid),
            request.quantity,
        )
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    views::respond(&cart, state, depot.request_id())
}
