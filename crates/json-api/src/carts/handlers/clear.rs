//! Clear Cart Handler

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

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Emptied cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;

    let cart = state
        .app
        .carts
        .clear_cart(buyer, depot.user())
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    views::respond(&cart, state, depot.request_id())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService, models::Cart};

    use crate::{
        identity::BUYER_ID_HEADER,
        test_helpers::{TEST_BUYER, carts_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/clear").post(handler))
    }

    #[tokio::test]
    async fn test_clear_cart_returns_zero_totals() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|buyer, user| Ok(Cart::new(buyer.clone(), user)));

        let mut res = TestClient::post("http://example.com/cart/clear")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.subtotal, "$0.00");
        assert_eq!(body.total, "$0.00");
        assert_eq!(body.total_saved, "$0.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_cart_without_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::CartNotFound));

        let res = TestClient::post("http://example.com/cart/clear")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
