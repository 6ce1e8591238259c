use std::time::Duration;

use clap::{Args, Subcommand};
use coupon_app::{
    context::AppContext,
    database::DbConfig,
    domain::coupons::DEFAULT_CLAIM_TIMEOUT,
};

mod claim;
mod create;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Create a coupon with its full stock available
    Create(create::CreateCouponArgs),
    /// Show a coupon's stock and claimants
    Show(show::ShowCouponArgs),
    /// Claim one unit of a coupon for a user
    Claim(claim::ClaimCouponArgs),
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Create(args) => create::run(args).await,
        CouponSubcommand::Show(args) => show::run(args).await,
        CouponSubcommand::Claim(args) => claim::run(args).await,
    }
}

async fn connect(database: &DbConfig, claim_timeout: Duration) -> Result<AppContext, String> {
    AppContext::from_config(database, claim_timeout)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))
}

async fn connect_default(database: &DbConfig) -> Result<AppContext, String> {
    connect(database, DEFAULT_CLAIM_TIMEOUT).await
}
