//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::domain::buyers::{BuyerId, UserId};

use crate::{identity::Identity, observability::REQUEST_ID_DEPOT_KEY};

/// Helpers for reading request-scoped values out of the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Buyer resolved by the identity middleware.
    fn buyer_or_400(&self) -> Result<&BuyerId, StatusError>;

    /// Authenticated user, if the gateway supplied one.
    fn user(&self) -> Option<UserId>;

    fn user_or_401(&self) -> Result<UserId, StatusError>;

    fn request_id(&self) -> Option<&str>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn buyer_or_400(&self) -> Result<&BuyerId, StatusError> {
        self.obtain::<Identity>()
            .map(|identity| &identity.buyer)
            .map_err(|_ignored| StatusError::bad_request().brief("Missing buyer identity"))
    }

    fn user(&self) -> Option<UserId> {
        self.obtain::<Identity>()
            .ok()
            .and_then(|identity| identity.user)
    }

    fn user_or_401(&self) -> Result<UserId, StatusError> {
        self.user()
            .ok_or_else(|| StatusError::unauthorized().brief("Sign in required"))
    }

    fn request_id(&self) -> Option<&str> {
        self.get::<String>(REQUEST_ID_DEPOT_KEY)
            .ok()
            .map(String::as_str)
    }
}
