//! Order Errors

use salvo::http::StatusError;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(
    error: &OrdersServiceError,
    request_id: Option<&str>,
) -> StatusError {
    crate::errors::from_kind(error.kind(), error, request_id)
}
