//! Cart Errors

use salvo::http::StatusError;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: &CartsServiceError, request_id: Option<&str>) -> StatusError {
    crate::errors::from_kind(error.kind(), error, request_id)
}
