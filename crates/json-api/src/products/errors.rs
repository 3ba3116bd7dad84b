//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::{domain::products::ProductsServiceError, storage::StoreError};

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::Invalid(errors) => {
            StatusError::bad_request().brief(format!("Invalid product: {errors}"))
        }
        ProductsServiceError::Storage(StoreError::Conflict) => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::Storage(source) => {
            error!("product storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
