//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, tz::TimeZone};
use rusty_money::iso;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::{
        buyers::{BuyerId, UserId},
        carts::{
            MockCartsService,
            models::{Cart, CartLine, LineProduct},
        },
        orders::{
            MockOrdersService,
            models::{Order, OrderCode, OrderItem, OrderUuid},
        },
        products::{
            MockProductsService,
            models::{Product, ProductUuid},
        },
    },
    settings::StoreSettings,
    storage::MockHealthCheck,
};

use crate::{identity, observability::request_logging, state::State};

pub(crate) const TEST_BUYER: &str = "test-buyer";
pub(crate) const TEST_USER: UserId = UserId::new(42);

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_or_create_cart().never();
    carts.expect_add_item().never();
    carts.expect_remove_item().never();
    carts.expect_update_quantity().never();
    carts.expect_clear_cart().never();
    carts.expect_checkout().never();
    carts.expect_associate_with_user().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();

    orders
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();

    products
}

fn strict_health_mock() -> MockHealthCheck {
    let mut health = MockHealthCheck::new();

    health.expect_check().never();

    health
}

fn state_with(
    carts: MockCartsService,
    orders: MockOrdersService,
    products: MockProductsService,
    health: MockHealthCheck,
) -> Arc<State> {
    Arc::new(State {
        app: AppContext {
            products: Arc::new(products),
            carts: Arc::new(carts),
            orders: Arc::new(orders),
            health: Arc::new(health),
            settings: Arc::new(StoreSettings::default()),
        },
        currency: iso::USD,
        time_zone: TimeZone::UTC,
    })
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(request_logging)
            .hoop(inject(state))
            .hoop(identity::handler)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    service_with(
        state_with(
            carts,
            strict_orders_mock(),
            strict_products_mock(),
            strict_health_mock(),
        ),
        route,
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service_with(
        state_with(
            strict_carts_mock(),
            orders,
            strict_products_mock(),
            strict_health_mock(),
        ),
        route,
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service_with(
        state_with(
            strict_carts_mock(),
            strict_orders_mock(),
            products,
            strict_health_mock(),
        ),
        route,
    )
}

pub(crate) fn health_service(health: MockHealthCheck, route: Router) -> Service {
    service_with(
        state_with(
            strict_carts_mock(),
            strict_orders_mock(),
            strict_products_mock(),
            health,
        ),
        route,
    )
}

pub(crate) fn test_buyer() -> BuyerId {
    BuyerId::new(TEST_BUYER)
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        title: "Kettle".to_string(),
        description: "Stovetop kettle".to_string(),
        image_url: None,
        price: 3_000,
        discount: 15,
        stock: 10,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A cart holding `quantity` of one product priced at 3000 with 15% off.
pub(crate) fn make_cart(product: ProductUuid, quantity: u32) -> Cart {
    let mut cart = Cart::new(test_buyer(), None);

    cart.lines.push(CartLine {
        product: LineProduct {
            stock: 3,
            ..LineProduct::from(make_product(product))
        },
        quantity,
    });

    _ = cart.recalculate();

    cart
}

pub(crate) fn make_order(code: &str) -> Order {
    Order {
        uuid: OrderUuid::new(),
        code: OrderCode::new(code),
        user_id: TEST_USER,
        subtotal: 6_000,
        total: 5_100,
        items: vec![OrderItem {
            product_uuid: ProductUuid::new(),
            title: "Kettle".to_string(),
            description: "Stovetop kettle".to_string(),
            image_url: None,
            price: 3_000,
            discount: 15,
            quantity: 2,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
