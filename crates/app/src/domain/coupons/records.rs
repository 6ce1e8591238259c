//! Coupon Records

use jiff::Timestamp;

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub name: String,
    pub amount: u64,
    pub remaining_amount: u64,
    pub created_at: Timestamp,
}

/// Claim Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    pub id: i64,
    pub user_id: String,
    pub coupon_name: String,
    pub created_at: Timestamp,
}

/// A coupon together with the users that claimed it, in claim order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponDetails {
    pub coupon: CouponRecord,
    pub claimed_by: Vec<String>,
}
