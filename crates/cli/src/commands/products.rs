//! Product commands.

use clap::Args;
use rust_decimal::Decimal;
use volt_core::{Category, Price, ProductId};
use volt_storefront::api::query::{
    PRODUCT_SORT_OPTIONS, Pagination, ProductFilter, ProductSortKey, SortCriteria, SortKey,
    SortOption,
};
use volt_storefront::api::types::{Product, ProductFilterOption, ProductPage, ProductRequest};
use volt_storefront::format::{filter_label, format_price, price_bounds};
use volt_storefront::validation::validate_product;
use volt_storefront::{AppError, AppState, Result};

/// Product filter selection. List options take comma-separated values.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Search by name
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long, value_delimiter = ',')]
    brand: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    category: Vec<Category>,

    #[arg(long)]
    min_price: Option<Decimal>,

    #[arg(long)]
    max_price: Option<Decimal>,

    #[arg(long, value_delimiter = ',')]
    color: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    memory: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    screen_size: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    battery_capacity: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    operating_system: Vec<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            name: self.search.clone(),
            brand: self.brand.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            color: self.color.clone(),
            memory: self.memory.clone(),
            screen_size: self.screen_size.clone(),
            battery_capacity: self.battery_capacity.clone(),
            operating_system: self.operating_system.clone(),
            category: self.category.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }
}

/// Product listing options.
#[derive(Debug, Args)]
pub struct ProductListArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Sort as `<field>_<asc|desc>`, e.g. `price_asc`; `volt products
    /// sort-options` lists the menu
    #[arg(long, default_value = "")]
    sort: String,

    /// Page number, starting at 0
    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    page_size: Option<u32>,
}

/// Details of a new product.
#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    brand: String,

    #[arg(long)]
    price: Decimal,

    #[arg(long)]
    description: String,

    /// Image URL
    #[arg(long)]
    image: String,

    #[arg(long)]
    category: String,

    #[arg(long, default_value = "")]
    memory: String,

    #[arg(long, default_value = "")]
    screen_size: String,

    #[arg(long, default_value = "")]
    battery_capacity: String,

    #[arg(long, default_value = "")]
    operating_system: String,

    #[arg(long, default_value = "")]
    color: String,
}

impl From<ProductArgs> for ProductRequest {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            price: Price::new(args.price),
            brand: args.brand,
            description: args.description,
            image: args.image,
            category: args.category,
            memory: args.memory,
            screen_size: args.screen_size,
            battery_capacity: args.battery_capacity,
            operating_system: args.operating_system,
            color: args.color,
        }
    }
}

/// Product fields to change. Omitted fields keep their current value.
#[derive(Debug, Default, Args)]
pub struct ProductUpdateArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    price: Option<Decimal>,

    #[arg(long)]
    description: Option<String>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    memory: Option<String>,

    #[arg(long)]
    screen_size: Option<String>,

    #[arg(long)]
    battery_capacity: Option<String>,

    #[arg(long)]
    operating_system: Option<String>,

    #[arg(long)]
    color: Option<String>,
}

impl ProductUpdateArgs {
    /// The current product with the given fields replaced.
    fn apply(&self, current: &Product) -> ProductRequest {
        let mut request = ProductRequest::from(current);
        let fields = [
            (&self.name, &mut request.name),
            (&self.brand, &mut request.brand),
            (&self.description, &mut request.description),
            (&self.image, &mut request.image),
            (&self.category, &mut request.category),
            (&self.memory, &mut request.memory),
            (&self.screen_size, &mut request.screen_size),
            (&self.battery_capacity, &mut request.battery_capacity),
            (&self.operating_system, &mut request.operating_system),
            (&self.color, &mut request.color),
        ];
        for (new, field) in fields {
            if let Some(value) = new {
                field.clone_from(value);
            }
        }
        if let Some(price) = self.price {
            request.price = Price::new(price);
        }
        request
    }
}

pub async fn list(app: &AppState, args: &ProductListArgs) -> Result<()> {
    let sort = SortCriteria::<ProductSortKey>::parse(&args.sort)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let pagination = Pagination {
        page_number: args.page,
        page_size: args.page_size,
        sort,
    };

    let page = app
        .api()
        .fetch_products(&app.token()?, &pagination, &args.filter.to_filter())
        .await?;
    print_page(&page);
    Ok(())
}

pub async fn top(app: &AppState) -> Result<()> {
    let page = app.api().fetch_top_rated().await?;
    print_page(&page);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(app: &AppState, product_id: ProductId) -> Result<()> {
    let product = app
        .api()
        .fetch_product(&app.token()?, product_id)
        .await
        .map_err(|e| AppError::from_lookup(e, format!("Product #{product_id}")))?;

    println!("#{} {} ({})", product.id, product.name, product.brand);
    println!("  Price:    {}", product.price);
    println!("  Category: {}", product.category);
    if let Some(rating) = product.average_rating {
        println!("  Rating:   {rating:.1} / 5");
    }
    for (label, value) in [
        ("Memory", &product.memory),
        ("Screen", &product.screen_size),
        ("Battery", &product.battery_capacity),
        ("OS", &product.operating_system),
        ("Color", &product.color),
    ] {
        if !value.is_empty() {
            println!("  {label:<9} {value}");
        }
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }

    let in_cart = app.cart().quantity(product_id);
    if in_cart > 0 {
        println!();
        println!("In cart: {in_cart}");
    }
    Ok(())
}

pub async fn filters(app: &AppState, args: &FilterArgs) -> Result<()> {
    let options = app
        .api()
        .fetch_filter_options(&app.token()?, &args.to_filter())
        .await?;
    print_filter_options(&options);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn add(app: &AppState, args: ProductArgs) -> Result<()> {
    let request = ProductRequest::from(args);
    validate_product(&request)?;

    let token = app.token()?;
    require_admin(app, &token).await?;

    let product = app.api().add_product(&token, &request).await?;
    println!("Created product #{} {}", product.id, product.name);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(app: &mut AppState, product_id: ProductId) -> Result<()> {
    let token = app.token()?;
    require_admin(app, &token).await?;

    let product = app
        .api()
        .delete_product(&token, product_id)
        .await
        .map_err(|e| AppError::from_lookup(e, format!("Product #{product_id}")))?;
    println!("Deleted product #{} {}", product.id, product.name);

    if app.cart_mut().remove(product_id)? {
        println!("Removed it from your cart.");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn update(app: &AppState, product_id: ProductId, args: &ProductUpdateArgs) -> Result<()> {
    let token = app.token()?;
    require_admin(app, &token).await?;

    let current = app
        .api()
        .fetch_product(&token, product_id)
        .await
        .map_err(|e| AppError::from_lookup(e, format!("Product #{product_id}")))?;

    let request = args.apply(&current);
    if request == ProductRequest::from(&current) {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }
    validate_product(&request)?;

    let product = app.api().update_product(&token, product_id, &request).await?;
    println!("Updated product #{} {} ({})", product.id, product.name, product.price);
    Ok(())
}

/// Print the product sort menu.
pub fn sort_options() {
    print_sort_options(&PRODUCT_SORT_OPTIONS);
}

/// Print a sort menu as `value  label` lines.
#[allow(clippy::print_stdout)]
pub fn print_sort_options<K: SortKey>(options: &[SortOption<K>]) {
    for option in options {
        println!("{}", sort_option_line(option));
    }
}

fn sort_option_line<K: SortKey>(option: &SortOption<K>) -> String {
    format!("  {:<22} {}", option.criteria.to_string(), option.label)
}

async fn require_admin(app: &AppState, token: &secrecy::SecretString) -> Result<()> {
    let user = app.api().current_user(token).await?;
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::BadRequest("Admin access required".to_string()))
    }
}

#[allow(clippy::print_stdout)]
fn print_page(page: &ProductPage) {
    if page.products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in &page.products {
        print_product_row(product);
    }
    println!(
        "Page {} of {} ({} products)",
        page.page.page_number + 1,
        page.page.total_pages.max(1),
        page.page.total_items
    );
    if let Some(next) = page.page.next_page_number() {
        println!("More: --page {next}");
    }
}

#[allow(clippy::print_stdout)]
fn print_product_row(product: &Product) {
    let rating = product
        .average_rating
        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
    println!(
        "  #{:<6} {:<30} {:<12} {:>12}  {rating}",
        product.id, product.name, product.brand, product.price
    );
}

#[allow(clippy::print_stdout)]
fn print_filter_options(options: &ProductFilterOption) {
    let (min, max) = price_bounds(&options.prices);
    println!("Price: {} - {}", format_price(min), format_price(max));

    for (key, values) in [
        ("category", &options.categories),
        ("brand", &options.brands),
        ("color", &options.colors),
        ("memory", &options.memories),
        ("screenSize", &options.screen_sizes),
        ("batteryCapacity", &options.battery_capacities),
        ("operatingSystem", &options.operating_systems),
    ] {
        if !values.is_empty() {
            println!("{}: {}", filter_label(key), values.join(", "));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use volt_storefront::api::query::ORDER_SORT_OPTIONS;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(4),
            name: "Galaxy S24".to_string(),
            price: Price::from_cents(79_900),
            brand: "Samsung".to_string(),
            description: "Flagship phone".to_string(),
            image: "https://cdn.example.com/s24.png".to_string(),
            memory: "256GB".to_string(),
            screen_size: "6.2".to_string(),
            battery_capacity: "4000".to_string(),
            operating_system: "Android".to_string(),
            color: "Black".to_string(),
            average_rating: Some(4.5),
            created_at: String::new(),
            updated_at: String::new(),
            category: "Cellular".to_string(),
        }
    }

    #[test]
    fn test_update_replaces_given_fields_only() {
        let args = ProductUpdateArgs {
            price: Some(Decimal::new(74_900, 2)),
            color: Some("Violet".to_string()),
            ..ProductUpdateArgs::default()
        };

        let request = args.apply(&product());
        assert_eq!(request.price, Price::from_cents(74_900));
        assert_eq!(request.color, "Violet");
        assert_eq!(request.name, "Galaxy S24");
        assert_eq!(request.memory, "256GB");
        assert!(validate_product(&request).is_ok());
    }

    #[test]
    fn test_update_without_fields_is_unchanged() {
        let current = product();
        let request = ProductUpdateArgs::default().apply(&current);
        assert_eq!(request, ProductRequest::from(&current));
    }

    #[test]
    fn test_sort_option_lines_parse_back() {
        for option in PRODUCT_SORT_OPTIONS {
            let line = sort_option_line(&option);
            let value = line.split_whitespace().next().unwrap();
            assert_eq!(
                SortCriteria::<ProductSortKey>::parse(value).unwrap(),
                Some(option.criteria)
            );
            assert!(line.ends_with(option.label));
        }
        assert!(sort_option_line(&ORDER_SORT_OPTIONS[1]).contains("createdAt_desc"));
    }
}
