//! App Router

use salvo::Router;

use crate::{carts, healthcheck, identity, orders, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::new()
                .hoop(identity::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::add_item::handler)
                                .push(
                                    Router::with_path("{product}")
                                        .patch(carts::update_item::handler)
                                        .delete(carts::remove_item::handler),
                                ),
                        )
                        .push(Router::with_path("clear").post(carts::clear::handler))
                        .push(Router::with_path("checkout").post(carts::checkout::handler))
                        .push(Router::with_path("claim").post(carts::claim::handler)),
                )
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .post(orders::create::handler)
                        .push(Router::with_path("{code}").get(orders::get::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{context::AppContext, settings::StoreSettings};

    use crate::{
        carts::views::CartResponse,
        identity::{BUYER_ID_HEADER, USER_ID_HEADER},
        observability::request_logging,
        orders::{create::OrderCreatedResponse, views::OrderResponse},
        products::views::ProductResponse,
        state::State,
    };

    use super::*;

    fn make_service() -> TestResult<Service> {
        let state = State::from_app_context(AppContext::in_memory(StoreSettings::default()))?;

        Ok(Service::new(
            Router::new()
                .hoop(request_logging)
                .hoop(inject(state))
                .push(app_router()),
        ))
    }

    #[tokio::test]
    async fn anonymous_cart_is_claimed_and_ordered() -> TestResult {
        let service = make_service()?;

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({ "title": "Kettle", "price": 3000, "discount": 15, "stock": 4 }))
            .send(&service)
            .await;

        let product: ProductResponse = res.take_json().await?;

        let mut res = TestClient::post("http://example.com/cart/items")
            .add_header(BUYER_ID_HEADER, "device-1", true)
            .json(&json!({ "product_uuid": product.uuid, "quantity": 2 }))
            .send(&service)
            .await;

        let cart: CartResponse = res.take_json().await?;

        assert_eq!(cart.total, "$51.00");

        let res = TestClient::post("http://example.com/cart/claim")
            .add_header(BUYER_ID_HEADER, "device-1", true)
            .add_header(USER_ID_HEADER, "7", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        let mut res = TestClient::post("http://example.com/orders")
            .add_header(BUYER_ID_HEADER, "device-1", true)
            .add_header(USER_ID_HEADER, "7", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let created: OrderCreatedResponse = res.take_json().await?;

        let mut res = TestClient::get(format!("http://example.com/orders/{}", created.code))
            .add_header(BUYER_ID_HEADER, "device-1", true)
            .add_header(USER_ID_HEADER, "7", true)
            .send(&service)
            .await;

        let order: OrderResponse = res.take_json().await?;

        assert_eq!(order.total, "$51.00");
        assert_eq!(order.subtotal, "$60.00");

        let mut res = TestClient::get(format!("http://example.com/products/{}", product.uuid))
            .send(&service)
            .await;

        let product: ProductResponse = res.take_json().await?;

        assert_eq!(product.stock, 2);

        Ok(())
    }

    #[tokio::test]
    async fn healthcheck_needs_no_identity() -> TestResult {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service()?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(
            res.headers().get(BUYER_ID_HEADER).is_none(),
            "healthcheck should not mint buyer ids"
        );

        Ok(())
    }
}
