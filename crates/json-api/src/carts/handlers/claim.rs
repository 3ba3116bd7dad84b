//! Claim Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Claim Cart Handler
///
/// Moves the buyer's anonymous cart onto the signed-in account, merging it
/// into any cart the account already has.
#[endpoint(
    tags("cart"),
    summary = "Claim Anonymous Cart",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart claimed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.buyer_or_400()?;
    let user = depot.user_or_401()?;

    state
        .app
        .carts
        .associate_with_user(buyer, user)
        .await
        .map_err(|error| into_status_error(&error, depot.request_id()))?;

    Ok(StatusCode::NO_CONTENT)
}
