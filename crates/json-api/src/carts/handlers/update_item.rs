//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
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

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateItemRequest {
    /// New quantity; zero removes the line
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart, product or line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or not enough stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;

    let cart = state
        .app
        .carts
        .update_quantity(
            buyer,
            depot.user(),
            ProductUuid::from_uuid(product.into_inner()),
            json.into_inner().quantity,
        )
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    views::respond(&cart, state, depot.request_id())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService, models::Cart};

    use crate::{
        identity::BUYER_ID_HEADER,
        test_helpers::{TEST_BUYER, carts_service, make_cart},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("cart/items/{product}").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_update_item_success() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(product, 3);

        let mut carts = MockCartsService::new();

        carts
            .expect_update_quantity()
            .once()
            .withf(move |_, _, uuid, quantity| *uuid == product && *quantity == 3)
            .return_once(move |_, _, _, _| Ok(cart));

        let mut res = TestClient::patch(format!("http://example.com/cart/items/{product}"))
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;
        let item = body.items.first().ok_or("missing item")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(item.quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_to_zero_returns_cart_without_line() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_quantity()
            .once()
            .withf(|_, _, _, quantity| *quantity == 0)
            .return_once(|buyer, user, _, _| Ok(Cart::new(buyer.clone(), user)));

        let mut res = TestClient::patch(format!("http://example.com/cart/items/{product}"))
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty(), "line should be gone");
        assert_eq!(body.unique_item_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_not_in_cart_returns_404() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_quantity()
            .once()
            .return_once(|_, _, _, _| Err(CartsServiceError::LineNotFound));

        let res = TestClient::patch(format!("http://example.com/cart/items/{product}"))
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_invalid_uuid_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_update_quantity().never();

        let res = TestClient::patch("http://example.com/cart/items/not-a-uuid")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
