use std::time::Duration;

use clap::Args;
use coupon_app::{
    database::DbConfig,
    domain::coupons::{DEFAULT_CLAIM_TIMEOUT_MS, data::NewClaim},
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
pub(crate) struct ClaimCouponArgs {
    /// Coupon name
    #[arg(long)]
    name: String,

    /// Claiming user
    #[arg(long)]
    user_id: String,

    /// Give up on the claim after this many milliseconds
    #[arg(
        long,
        env = "CLAIM_TIMEOUT_MS",
        default_value_t = DEFAULT_CLAIM_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    claim_timeout_ms: u64,

    #[command(flatten)]
    database: DbConfig,
}

pub(crate) async fn run(args: ClaimCouponArgs) -> Result<(), String> {
    let coupon_name = args.name.trim();
    let user_id = args.user_id.trim();

    if coupon_name.is_empty() || user_id.is_empty() {
        return Err("coupon name and user id cannot be empty".to_string());
    }

    let app =
        super::connect(&args.database, Duration::from_millis(args.claim_timeout_ms)).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    app.coupons
        .claim_coupon(
            NewClaim {
                user_id: user_id.to_string(),
                coupon_name: coupon_name.to_string(),
            },
            cancel,
        )
        .await
        .map_err(|error| format!("failed to claim coupon: {error}"))?;

    println!("claimed: {coupon_name}");
    println!("user_id: {user_id}");

    Ok(())
}
