//! Order views.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{Order, OrderItem, Page};

use crate::{money::format_minor, state::State};

/// Display format for purchase times.
const PURCHASED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub code: String,
    pub subtotal: String,
    pub total: String,

    /// Purchase time in the store's display time zone
    pub purchased_at: String,

    /// Products as they were when the order was placed
    pub items: Vec<OrderItemResponse>,
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub unit_price: String,
    pub discount: i32,
    pub quantity: u32,
}

/// Order history page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub page: u32,
    pub page_size: u32,

    /// Orders matching the query across all pages
    pub total: u64,

    pub total_pages: u64,
}

impl OrderResponse {
    pub(crate) fn build(order: &Order, state: &State) -> Self {
        let purchased_at = order
            .created_at
            .to_zoned(state.time_zone.clone())
            .strftime(PURCHASED_AT_FORMAT)
            .to_string();

        Self {
            code: order.code.to_string(),
            subtotal: format_minor(order.subtotal, state.currency),
            total: format_minor(order.total, state.currency),
            purchased_at,
            items: order
                .items
                .iter()
                .map(|item| OrderItemResponse::build(item, state))
                .collect(),
        }
    }
}

impl OrderItemResponse {
    fn build(item: &OrderItem, state: &State) -> Self {
        Self {
            product_uuid: item.product_uuid.into_uuid(),
            title: item.title.clone(),
            description: item.description.clone(),
            image_url: item
                .image_url
                .clone()
                .unwrap_or_else(|| state.app.settings.default_image_url.clone()),
            unit_price: format_minor(item.price, state.currency),
            discount: item.discount,
            quantity: item.quantity,
        }
    }
}

impl OrdersResponse {
    pub(crate) fn build(page: &Page<Order>, state: &State) -> Self {
        Self {
            orders: page
                .items
                .iter()
                .map(|order| OrderResponse::build(order, state))
                .collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages(),
        }
    }
}
