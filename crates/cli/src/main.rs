//! Volt CLI - shop the Volt Store from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the token is kept in local storage)
//! volt login -u dana -p 'Secr3t_pass'
//!
//! # Browse and fill the cart
//! volt products sort-options
//! volt products list --category Cellular --sort price_asc
//! volt cart add 42 --quantity 2
//! volt cart show
//!
//! # Place the order
//! volt checkout --address "1 Main St" --city Haifa --postal-code 1234567 --phone 0501234567
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the cart
//! - `products` - Browse products; `add`/`update`/`delete` need an admin account
//! - `orders` - List orders; `all`/`status` need an admin account
//! - `checkout` - Order everything in the cart
//! - `login`, `logout`, `register`, `whoami` - Session
//! - `account` - Change the password or account data
//! - `theme` - Show or toggle the color theme
//! - `rate` - Rate a product or show your rating

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use volt_core::{OrderId, OrderStatus, ProductId};
use volt_storefront::config::StorefrontConfig;
use volt_storefront::{AppError, AppState};

mod commands;

use commands::account::{PasswordArgs, RegisterArgs, UpdateAccountArgs};
use commands::checkout::CheckoutArgs;
use commands::orders::OrderListArgs;
use commands::products::{FilterArgs, ProductArgs, ProductListArgs, ProductUpdateArgs};

#[derive(Parser)]
#[command(name = "volt")]
#[command(author, version, about = "Volt Store command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// List and manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Order everything in the cart
    Checkout(CheckoutArgs),
    /// Log in and remember the session
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Create an account and log in
    Register(RegisterArgs),
    /// Show the logged-in account
    Whoami,
    /// Change the logged-in account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Show or toggle the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Rate products
    Rate {
        #[command(subcommand)]
        action: RateAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Change the password
    Password(PasswordArgs),
    /// Change username, email or avatar; ends the session
    Update(UpdateAccountArgs),
}

#[derive(Subcommand)]
enum RateAction {
    /// Rate a product from 1 to 5
    Set {
        /// Product ID
        product_id: ProductId,

        /// Stars (1-5)
        rating: u8,

        /// Change an existing rating instead of adding one
        #[arg(long)]
        update: bool,
    },
    /// Show your rating of a product
    Show {
        /// Product ID
        product_id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List the cart with prices
    Show,
    /// Add units of a product
    Add {
        /// Product ID
        product_id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Take one unit of a product out
    Decrease {
        /// Product ID
        product_id: ProductId,
    },
    /// Take a product out entirely
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Search and filter products
    List(ProductListArgs),
    /// Show one product
    Show {
        /// Product ID
        product_id: ProductId,
    },
    /// Show the best-rated products
    Top,
    /// Show the values each filter can take
    Filters(FilterArgs),
    /// Create a product (admin)
    Add(ProductArgs),
    /// Change fields of a product (admin)
    Update {
        /// Product ID
        product_id: ProductId,

        #[command(flatten)]
        fields: ProductUpdateArgs,
    },
    /// Delete a product (admin)
    Delete {
        /// Product ID
        product_id: ProductId,
    },
    /// List the values `list --sort` accepts
    SortOptions,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders
    List(OrderListArgs),
    /// List every order (admin)
    All(OrderListArgs),
    /// Approve or decline an order (admin)
    Status {
        /// Order ID
        order_id: OrderId,

        /// New status (`pending`, `approved`, `declined`)
        status: OrderStatus,
    },
    /// List the values `--sort` accepts
    SortOptions,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    init_tracing(config.as_ref().is_ok_and(|c| c.log_json));

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), AppError> {
    let mut app = AppState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&app).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut app, product_id, quantity)?,
            CartAction::Decrease { product_id } => commands::cart::decrease(&mut app, product_id)?,
            CartAction::Remove { product_id } => commands::cart::remove(&mut app, product_id)?,
            CartAction::Clear => commands::cart::clear(&mut app)?,
        },
        Commands::Products { action } => match action {
            ProductAction::List(args) => commands::products::list(&app, &args).await?,
            ProductAction::Show { product_id } => commands::products::show(&app, product_id).await?,
            ProductAction::Top => commands::products::top(&app).await?,
            ProductAction::Filters(args) => commands::products::filters(&app, &args).await?,
            ProductAction::Add(args) => commands::products::add(&app, args).await?,
            ProductAction::Update { product_id, fields } => {
                commands::products::update(&app, product_id, &fields).await?;
            }
            ProductAction::Delete { product_id } => {
                commands::products::delete(&mut app, product_id).await?;
            }
            ProductAction::SortOptions => commands::products::sort_options(),
        },
        Commands::Orders { action } => match action {
            OrderAction::List(args) => commands::orders::list(&app, &args, false).await?,
            OrderAction::All(args) => commands::orders::list(&app, &args, true).await?,
            OrderAction::Status { order_id, status } => {
                commands::orders::set_status(&app, order_id, status).await?;
            }
            OrderAction::SortOptions => commands::orders::sort_options(),
        },
        Commands::Checkout(args) => commands::checkout::run(&mut app, args).await?,
        Commands::Login { username, password } => {
            commands::account::login(&mut app, &username, password).await?;
        }
        Commands::Logout => commands::account::logout(&mut app)?,
        Commands::Register(args) => commands::account::register(&mut app, args).await?,
        Commands::Whoami => commands::account::whoami(&app).await?,
        Commands::Account { action } => match action {
            AccountAction::Password(args) => {
                commands::account::change_password(&app, &args).await?;
            }
            AccountAction::Update(args) => commands::account::update(&mut app, &args).await?,
        },
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(&app),
            ThemeAction::Toggle => commands::theme::toggle(&mut app)?,
        },
        Commands::Rate { action } => match action {
            RateAction::Set {
                product_id,
                rating,
                update,
            } => commands::account::rate(&app, product_id, rating, update).await?,
            RateAction::Show { product_id } => {
                commands::account::show_rating(&app, product_id).await?;
            }
        },
    }
    Ok(())
}
