//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use tokio_util::sync::CancellationToken;

use coupon_app::{
    context::AppContext,
    domain::coupons::{
        MockCouponsService,
        records::{CouponDetails, CouponRecord},
    },
};

use crate::state::State;

pub(crate) fn make_coupon(name: &str, amount: u64, remaining_amount: u64) -> CouponRecord {
    CouponRecord {
        name: name.to_string(),
        amount,
        remaining_amount,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_details(name: &str, claimed_by: &[&str]) -> CouponDetails {
    let amount = 10;

    CouponDetails {
        coupon: make_coupon(name, amount, amount - claimed_by.len() as u64),
        claimed_by: claimed_by.iter().map(ToString::to_string).collect(),
    }
}

pub(crate) fn state_with_coupons(
    coupons: MockCouponsService,
    shutdown: CancellationToken,
) -> Arc<State> {
    let app = AppContext {
        coupons: Arc::new(coupons),
    };

    State::shared(app, shutdown)
}

pub(crate) fn coupons_service_with_shutdown(
    coupons: MockCouponsService,
    shutdown: CancellationToken,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_coupons(coupons, shutdown)))
            .push(route),
    )
}

pub(crate) fn coupons_service(coupons: MockCouponsService, route: Router) -> Service {
    coupons_service_with_shutdown(coupons, CancellationToken::new(), route)
}
