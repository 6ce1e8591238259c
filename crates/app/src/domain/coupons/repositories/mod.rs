//! Coupons Repositories

mod claims;
mod coupons;

pub(crate) use claims::PgClaimsRepository;
pub(crate) use coupons::PgCouponsRepository;
