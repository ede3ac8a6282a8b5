//! Cart commands.

use volt_core::ProductId;
use volt_storefront::cart::{CartError, CartView};
use volt_storefront::{AppState, Result};

/// Print the cart, with prices when logged in.
#[allow(clippy::print_stdout)]
pub async fn show(app: &AppState) -> Result<()> {
    let cart = app.cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    if !app.session().is_logged_in() {
        for entry in cart.entries() {
            println!("  #{:<6} x{}", entry.product_id, entry.quantity);
        }
        println!("{} item(s). Log in to see prices.", cart.quantity_total());
        return Ok(());
    }

    print_view(&app.cart_view().await?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_view(view: &CartView) {
    for item in &view.items {
        let limit = if item.can_increase { "" } else { "  (max)" };
        println!(
            "  #{:<6} {:<30} {:>12} x{} = {:>12}{limit}",
            item.product_id, item.name, item.unit_price, item.quantity, item.line_price
        );
    }
    for entry in &view.unavailable {
        println!("  #{:<6} (unavailable) x{}", entry.product_id, entry.quantity);
    }
    println!("{} item(s), subtotal {}", view.item_count, view.subtotal);
}

/// Add `quantity` units, stopping at the per-product limit.
#[allow(clippy::print_stdout)]
pub fn add(app: &mut AppState, product_id: ProductId, quantity: u32) -> Result<()> {
    let cart = app.cart_mut();
    for _ in 0..quantity {
        match cart.increase(product_id) {
            Ok(_) => {}
            Err(CartError::QuantityLimit { max, .. }) => {
                println!("Product #{product_id} is limited to {max} units.");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!(
        "Product #{product_id}: {} in cart ({} item(s) total)",
        cart.quantity(product_id),
        cart.quantity_total()
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn decrease(app: &mut AppState, product_id: ProductId) -> Result<()> {
    if app.cart().quantity(product_id) == 0 {
        println!("Product #{product_id} is not in the cart.");
        return Ok(());
    }

    match app.cart_mut().decrease(product_id)? {
        0 => println!("Removed product #{product_id}."),
        quantity => println!("Product #{product_id}: {quantity} in cart"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn remove(app: &mut AppState, product_id: ProductId) -> Result<()> {
    if app.cart_mut().remove(product_id)? {
        println!("Removed product #{product_id}.");
    } else {
        println!("Product #{product_id} is not in the cart.");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn clear(app: &mut AppState) -> Result<()> {
    app.cart_mut().clear()?;
    println!("Cart emptied.");
    Ok(())
}
