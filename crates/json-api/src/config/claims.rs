//! Claims Config

use std::time::Duration;

use clap::Args;
use coupon_app::domain::coupons::DEFAULT_CLAIM_TIMEOUT_MS;

/// Claim processing settings.
#[derive(Debug, Args)]
pub struct ClaimsConfig {
    /// Upper bound on a single claim attempt in milliseconds, row-lock wait included
    #[arg(
        long,
        env = "CLAIM_TIMEOUT_MS",
        default_value_t = DEFAULT_CLAIM_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub claim_timeout_ms: u64,
}

impl ClaimsConfig {
    #[must_use]
    pub fn claim_timeout(&self) -> Duration {
        Duration::from_millis(self.claim_timeout_ms)
    }
}
