//! Create Order Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Order Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCreatedResponse {
    /// Code the order can be looked up by
    pub code: String,
}

/// Create Order Handler
///
/// Turns the signed-in user's cart into an order. Stock is taken and the
/// cart emptied in the same transaction; on any failure nothing changes.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Order rolled back"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let code = state
        .app
        .orders
        .create_order(user)
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    res.add_header(LOCATION, format!("/orders/{code}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(OrderCreatedResponse {
        code: code.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::{
        domain::orders::{MockOrdersService, OrdersServiceError, models::OrderCode},
        storage::StoreError,
    };

    use crate::{
        identity::{BUYER_ID_HEADER, USER_ID_HEADER},
        test_helpers::{TEST_BUYER, TEST_USER, orders_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").post(handler))
    }

    #[tokio::test]
    async fn test_create_order_success() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|user| *user == TEST_USER)
            .return_once(|_| Ok(OrderCode::new("ORD-260301120000-123")));

        let mut res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        let body: OrderCreatedResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/orders/ORD-260301120000-123"));
        assert_eq!(body.code, "ORD-260301120000-123");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_requires_user() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_without_cart_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::CartNotFound));

        let res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rollback_returns_500() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::Storage(StoreError::ConstraintViolation)));

        let res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
