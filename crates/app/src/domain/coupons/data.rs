//! Coupons Data

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub name: String,
    pub amount: u64,
}

/// New Claim Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaim {
    pub user_id: String,
    pub coupon_name: String,
}
