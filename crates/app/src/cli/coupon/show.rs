use clap::Args;
use coupon_app::database::DbConfig;

#[derive(Debug, Args)]
pub(crate) struct ShowCouponArgs {
    /// Coupon name
    #[arg(long)]
    name: String,

    #[command(flatten)]
    database: DbConfig,
}

pub(crate) async fn run(args: ShowCouponArgs) -> Result<(), String> {
    let app = super::connect_default(&args.database).await?;

    let details = app
        .coupons
        .get_coupon(args.name.trim())
        .await
        .map_err(|error| format!("failed to fetch coupon: {error}"))?;

    println!("name: {}", details.coupon.name);
    println!("amount: {}", details.coupon.amount);
    println!("remaining_amount: {}", details.coupon.remaining_amount);
    println!("created_at: {}", details.coupon.created_at);
    println!("claimed_by: {}", details.claimed_by.join(", "));

    Ok(())
}
