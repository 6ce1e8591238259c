//! Create Coupon Handler

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use coupon_app::domain::coupons::data::NewCoupon;

use crate::{coupons::errors::into_status_error, extensions::*};

use super::required;

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCouponRequest {
    /// Unique coupon name
    pub name: String,

    /// Units of stock, at least one
    pub amount: u64,
}

impl CreateCouponRequest {
    fn validate(self) -> Result<NewCoupon, StatusError> {
        let name = required(&self.name, "name")?;

        if name.contains('/') {
            return Err(StatusError::bad_request().brief("name must not contain '/'"));
        }

        if self.amount == 0 {
            return Err(StatusError::bad_request().brief("amount must be at least 1"));
        }

        Ok(NewCoupon {
            name: name.to_string(),
            amount: self.amount,
        })
    }
}

/// Coupon Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponCreatedResponse {
    /// Created coupon name
    pub name: String,

    /// Units of stock available
    pub remaining_amount: u64,
}

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Coupon already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponCreatedResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let coupon = json.into_inner().validate()?;

    let created = state
        .app
        .coupons
        .create_coupon(coupon)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", created.name), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CouponCreatedResponse {
        name: created.name,
        remaining_amount: created.remaining_amount,
    }))
}
