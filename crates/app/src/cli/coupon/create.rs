use clap::Args;
use coupon_app::{database::DbConfig, domain::coupons::data::NewCoupon};

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Unique coupon name
    #[arg(long)]
    name: String,

    /// Units of stock, at least one
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    amount: u64,

    #[command(flatten)]
    database: DbConfig,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let name = args.name.trim();

    if name.is_empty() {
        return Err("coupon name cannot be empty".to_string());
    }

    let app = super::connect_default(&args.database).await?;

    let coupon = app
        .coupons
        .create_coupon(NewCoupon {
            name: name.to_string(),
            amount: args.amount,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("name: {}", coupon.name);
    println!("amount: {}", coupon.amount);
    println!("created_at: {}", coupon.created_at);

    Ok(())
}
