//! Claim Coupon Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use coupon_app::domain::coupons::data::NewClaim;

use crate::{
    coupons::errors::{claim_outcome, into_status_error},
    extensions::*,
    observability::observe_claim,
};

use super::required;

/// Claim Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ClaimCouponRequest {
    /// The user claiming the coupon
    pub user_id: String,
}

/// Coupon Claimed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponClaimedResponse {
    pub coupon_name: String,
    pub user_id: String,
}

/// Claim Coupon Handler
///
/// Takes one unit of stock for the user. Each user can claim a coupon once.
#[endpoint(
    tags("coupons"),
    summary = "Claim Coupon",
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon claimed", body = CouponClaimedResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Coupon already claimed by this user"),
        (status_code = StatusCode::GONE, description = "Coupon out of stock"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Claim did not complete, safe to retry"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    name: PathParam<String>,
    json: JsonBody<ClaimCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponClaimedResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let name = name.into_inner();
    let request = json.into_inner();

    let claim = NewClaim {
        user_id: required(&request.user_id, "user_id")?.to_string(),
        coupon_name: required(&name, "name")?.to_string(),
    };

    let response = CouponClaimedResponse {
        coupon_name: claim.coupon_name.clone(),
        user_id: claim.user_id.clone(),
    };

    let result = state
        .app
        .coupons
        .claim_coupon(claim, state.shutdown.child_token())
        .await;

    observe_claim(claim_outcome(&result));

    result.map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(response))
}
