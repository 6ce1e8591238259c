//! Test Helpers
//!
//! Direct reads of the tables, bypassing the service, so assertions do not
//! trust the code under test.

use sqlx::{PgPool, query, query_scalar};

use crate::{database::Executor, domain::coupons::data::NewClaim};

pub(crate) fn claim(user_id: &str, coupon_name: &str) -> NewClaim {
    NewClaim {
        user_id: user_id.to_string(),
        coupon_name: coupon_name.to_string(),
    }
}

pub(crate) async fn remaining_amount(pool: &PgPool, coupon_name: &str) -> i64 {
    query_scalar("SELECT remaining_amount FROM coupons WHERE name = $1")
        .bind(coupon_name)
        .fetch_one(pool)
        .await
        .expect("Failed to read remaining_amount")
}

pub(crate) async fn claim_count(pool: &PgPool, coupon_name: &str) -> i64 {
    query_scalar("SELECT COUNT(*) FROM claims WHERE coupon_name = $1")
        .bind(coupon_name)
        .fetch_one(pool)
        .await
        .expect("Failed to count claims")
}

/// Take the coupon's row lock and keep it until `executor`'s transaction ends.
pub(crate) async fn hold_row_lock(executor: &mut dyn Executor, coupon_name: &str) {
    executor
        .execute(query("SELECT 1 FROM coupons WHERE name = $1 FOR UPDATE").bind(coupon_name))
        .await
        .expect("Failed to lock coupon row");
}
