//! Coupon Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use coupon_app::domain::coupons::CouponsServiceError;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon already exists")
        }
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::OutOfStock => StatusError::gone().brief("Coupon out of stock"),
        CouponsServiceError::AlreadyClaimed => {
            StatusError::conflict().brief("Coupon already claimed by this user")
        }
        CouponsServiceError::InvalidReference
        | CouponsServiceError::InvalidData
        | CouponsServiceError::InvalidAmount(_) => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::Cancelled | CouponsServiceError::TimedOut => {
            StatusError::service_unavailable().brief("Claim did not complete, try again")
        }
        CouponsServiceError::Unavailable(source) => {
            warn!("storage unavailable: {source}");

            StatusError::service_unavailable()
        }
        CouponsServiceError::Sql(source) => {
            error!("coupon storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Label for `coupon_json_claims_total`.
pub(crate) fn claim_outcome(result: &Result<(), CouponsServiceError>) -> &'static str {
    match result {
        Ok(()) => "claimed",
        Err(CouponsServiceError::NotFound) => "not_found",
        Err(CouponsServiceError::OutOfStock) => "out_of_stock",
        Err(CouponsServiceError::AlreadyClaimed) => "already_claimed",
        Err(CouponsServiceError::Cancelled) => "cancelled",
        Err(CouponsServiceError::TimedOut) => "timed_out",
        Err(CouponsServiceError::Unavailable(_)) => "unavailable",
        Err(_) => "error",
    }
}
