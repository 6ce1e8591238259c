//! Get Coupon Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use coupon_app::domain::coupons::records::CouponDetails;

use crate::{coupons::errors::into_status_error, extensions::*};

use super::required;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    /// The unique coupon name
    pub name: String,

    /// Units of stock the coupon was created with
    pub amount: u64,

    /// Units of stock still available to claim
    pub remaining_amount: u64,

    /// The date and time the coupon was created
    pub created_at: String,

    /// Users that claimed the coupon, in claim order
    pub claimed_by: Vec<String>,
}

impl From<CouponDetails> for CouponResponse {
    fn from(details: CouponDetails) -> Self {
        CouponResponse {
            name: details.coupon.name,
            amount: details.coupon.amount,
            remaining_amount: details.coupon.remaining_amount,
            created_at: details.coupon.created_at.to_string(),
            claimed_by: details.claimed_by,
        }
    }
}

/// Get Coupon Handler
///
/// Returns a coupon's stock and the users that claimed it.
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon found", body = CouponResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    name: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let name = name.into_inner();

    let details = state
        .app
        .coupons
        .get_coupon(required(&name, "name")?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
