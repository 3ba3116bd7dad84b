//! Buyer and user identity middleware.
//!
//! Every storefront request carries a buyer token in `x-buyer-id`. Clients
//! without one get a fresh token generated here and echoed back so they can
//! send it on the next request. Authentication happens upstream; the gateway
//! forwards the signed-in account as `x-user-id`.

use salvo::prelude::*;
use tracing::warn;
use uuid::Uuid;

use storefront_app::{
    domain::buyers::{BuyerId, UserId},
    validation::validate_buyer_id,
};

pub(crate) const BUYER_ID_HEADER: &str = "x-buyer-id";
pub(crate) const USER_ID_HEADER: &str = "x-user-id";

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) buyer: BuyerId,
    pub(crate) user: Option<UserId>,
}

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let buyer = match buyer_from_header(req.header::<String>(BUYER_ID_HEADER).as_deref()) {
        Ok(buyer) => buyer,
        Err(message) => {
            res.render(StatusError::bad_request().brief(message));
            ctrl.skip_rest();

            return;
        }
    };

    let user = match user_from_header(req.header::<String>(USER_ID_HEADER).as_deref()) {
        Ok(user) => user,
        Err(message) => {
            res.render(StatusError::bad_request().brief(message));
            ctrl.skip_rest();

            return;
        }
    };

    if let Err(error) = res.add_header(BUYER_ID_HEADER, buyer.as_str(), true) {
        warn!(error = %error, "failed to echo buyer id header");
    }

    depot.inject(Identity { buyer, user });

    ctrl.call_next(req, depot, res).await;
}

fn buyer_from_header(value: Option<&str>) -> Result<BuyerId, String> {
    let Some(value) = value else {
        return Ok(BuyerId::new(Uuid::now_v7().to_string()));
    };

    let value = value.trim();

    validate_buyer_id(value).map_err(|errors| format!("Invalid {BUYER_ID_HEADER}: {errors}"))?;

    Ok(BuyerId::new(value))
}

fn user_from_header(value: Option<&str>) -> Result<Option<UserId>, String> {
    value
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map(UserId::new)
                .map_err(|error| format!("Invalid {USER_ID_HEADER}: {error}"))
        })
        .transpose()
}
