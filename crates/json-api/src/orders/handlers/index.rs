//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::orders::models::OrderQuery;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, views::OrdersResponse},
    state::State,
};

/// Order Index Handler
///
/// Returns the signed-in user's orders, newest first. `search` matches the
/// order code and the titles and descriptions of ordered products.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "Page of orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid page or page size"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    search: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let query = OrderQuery {
        search: search.into_inner(),
        page: page.into_inner().unwrap_or(1),
        page_size: page_size.into_inner(),
    };

    let page = state
        .app
        .orders
        .list_orders(user, query)
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    Ok(Json(OrdersResponse::build(&page, state)))
}
