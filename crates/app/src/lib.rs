//! Coupon stock, claims and the storage they live in.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;
