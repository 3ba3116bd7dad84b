//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::domain::orders::models::OrderCode;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, views::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Orders belonging to other users are reported as not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user, &OrderCode::new(code.into_inner()))
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    Ok(Json(OrderResponse::build(&order, state)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::{
        identity::{BUYER_ID_HEADER, USER_ID_HEADER},
        test_helpers::{TEST_BUYER, TEST_USER, make_order, orders_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{code}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let order = make_order("ORD-260301120000-123");

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(|user, code| *user == TEST_USER && code.as_str() == "ORD-260301120000-123")
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get("http://example.com/orders/ORD-260301120000-123")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.code, "ORD-260301120000-123");
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.total, "$51.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::OrderNotFound));

        let res = TestClient::get("http://example.com/orders/ORD-000000000000-999")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .add_header(USER_ID_HEADER, TEST_USER.to_string(), true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_requires_user() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/ORD-260301120000-123")
            .add_header(BUYER_ID_HEADER, TEST_BUYER, true)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
