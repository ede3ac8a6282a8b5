//! Checkout command.

use clap::Args;
use volt_storefront::checkout::{CheckoutForm, PaymentMethod, submit_order};
use volt_storefront::{AppState, Result};

/// Shipping and payment details.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    /// Seven digits
    #[arg(long)]
    postal_code: String,

    /// Mobile number, `05` followed by eight digits
    #[arg(long)]
    phone: String,

    /// `cash` or `credit-card`
    #[arg(long, default_value = "cash")]
    payment: PaymentMethod,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            phone_number: args.phone,
            payment: args.payment,
        }
    }
}

#[allow(clippy::print_stdout)]
pub async fn run(app: &mut AppState, args: CheckoutArgs) -> Result<()> {
    let token = app.token()?;
    let form = CheckoutForm::from(args);
    let api = app.api().clone();

    let order = submit_order(app.cart_mut(), &api, &token, &form).await?;

    println!("Order #{} placed, total {}.", order.id, order.total_price);
    println!("Track it with: volt orders list");
    Ok(())
}
