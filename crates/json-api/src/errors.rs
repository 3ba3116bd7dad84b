//! Service error to HTTP status mapping.

use std::{error::Error, fmt::Write as _};

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::ErrorKind;

/// Map a classified service error to a status.
///
/// Client-caused failures carry the error message. Everything else is
/// logged and answered with the request id as a reference.
pub(crate) fn from_kind(
    kind: ErrorKind,
    error: &(dyn Error + 'static),
    request_id: Option<&str>,
) -> StatusError {
    match kind {
        ErrorKind::NotFound => StatusError::not_found().brief(error.to_string()),
        ErrorKind::InvalidInput | ErrorKind::InvalidState => {
            StatusError::bad_request().brief(error.to_string())
        }
        ErrorKind::ConsistencyViolation => {
            error!(
                request_id = request_id.unwrap_or_default(),
                error = %chain(error),
                "consistency violation"
            );

            internal_error(request_id)
        }
        ErrorKind::Internal => {
            error!(
                request_id = request_id.unwrap_or_default(),
                error = %chain(error),
                "request failed"
            );

            internal_error(request_id)
        }
    }
}

fn internal_error(request_id: Option<&str>) -> StatusError {
    match request_id {
        Some(id) => {
            StatusError::internal_server_error().brief(format!("Internal error, reference {id}"))
        }
        None => StatusError::internal_server_error(),
    }
}

/// `error: source: source` on one line.
fn chain(error: &(dyn Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        _ = write!(rendered, ": {cause}");
        source = cause.source();
    }

    rendered
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront_app::{
        domain::{carts::CartsServiceError, products::models::ProductUuid},
        storage::StoreError,
    };

    use super::*;

    #[test]
    fn stock_errors_keep_their_message() {
        let error = CartsServiceError::InsufficientStock {
            product: ProductUuid::new(),
            available: 2,
            requested: 5,
        };

        let status = from_kind(error.kind(), &error, Some("req-1"));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert!(
            status.brief.contains("only 2 in stock"),
            "unexpected brief: {}",
            status.brief
        );
    }

    #[test]
    fn internal_errors_reference_the_request() {
        let error = CartsServiceError::Storage(StoreError::Unavailable("down".to_string()));

        let status = from_kind(error.kind(), &error, Some("req-1"));

        assert_eq!(status.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(status.brief.contains("req-1"), "unexpected brief: {}", status.brief);
        assert!(!status.brief.contains("down"), "leaked detail: {}", status.brief);
    }

    #[test]
    fn chain_includes_sources() {
        let error = CartsServiceError::Storage(StoreError::Unavailable("down".to_string()));

        assert_eq!(chain(&error), "storage error: storage unavailable: down");
    }
}
