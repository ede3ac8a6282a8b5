//! Order commands.

use clap::Args;
use volt_core::{OrderId, OrderStatus};
use volt_storefront::api::query::{ORDER_SORT_OPTIONS, OrderSortKey, Pagination, SortCriteria};
use volt_storefront::api::types::{Order, OrderPage};
use volt_storefront::format::extract_date;
use volt_storefront::{AppError, AppState, Result};

use super::products::print_sort_options;

/// Order listing options.
#[derive(Debug, Args)]
pub struct OrderListArgs {
    /// Sort as `<field>_<asc|desc>`, e.g. `createdAt_desc`; `volt orders
    /// sort-options` lists the menu
    #[arg(long, default_value = "")]
    sort: String,

    /// Page number, starting at 0
    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    page_size: Option<u32>,

    /// Also list each order's products
    #[arg(short, long)]
    detailed: bool,
}

/// List the user's orders, or every order when `all` is set.
pub async fn list(app: &AppState, args: &OrderListArgs, all: bool) -> Result<()> {
    let sort = SortCriteria::<OrderSortKey>::parse(&args.sort)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let pagination = Pagination {
        page_number: args.page,
        page_size: args.page_size,
        sort,
    };

    let token = app.token()?;
    let page = if all {
        app.api().fetch_all_orders(&token, &pagination).await?
    } else {
        app.api().fetch_customer_orders(&token, &pagination).await?
    };

    print_page(&page, all, args.detailed);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn set_status(app: &AppState, order_id: OrderId, status: OrderStatus) -> Result<()> {
    let order = app
        .api()
        .update_order_status(&app.token()?, order_id, status)
        .await
        .map_err(|e| AppError::from_lookup(e, format!("Order #{order_id}")))?;
    println!("Order #{} is now {}", order.id, order.status);
    Ok(())
}

/// Print the order sort menu.
pub fn sort_options() {
    print_sort_options(&ORDER_SORT_OPTIONS);
}

#[allow(clippy::print_stdout)]
fn print_page(page: &OrderPage, with_customer: bool, detailed: bool) {
    if page.orders.is_empty() {
        println!("No orders found.");
        return;
    }
    for order in &page.orders {
        print_order(order, with_customer, detailed);
    }
    println!(
        "Page {} of {} ({} orders)",
        page.page.page_number + 1,
        page.page.total_pages.max(1),
        page.page.total_items
    );
    if let Some(next) = page.page.next_page_number() {
        println!("More: --page {next}");
    }
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order, with_customer: bool, detailed: bool) {
    let date = extract_date(&order.created_at).unwrap_or_else(|| order.created_at.clone());
    let customer = if with_customer {
        format!("  {}", order.customer.username)
    } else {
        String::new()
    };
    println!(
        "  #{:<6} {date}  {:<8} {:>12}{customer}",
        order.id, order.status, order.total_price
    );

    if detailed {
        for item in &order.items {
            println!(
                "      {} x{} = {}",
                item.product.name, item.quantity, item.sub_total
            );
        }
        println!(
            "      Ship to {}, {} {} ({}), paid by {}",
            order.address, order.city, order.postal_code, order.phone_number, order.payment_information
        );
    }
}
