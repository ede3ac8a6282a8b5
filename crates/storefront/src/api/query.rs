//! Query-string building for product filtering, sorting and pagination.
//!
//! The API takes list filters as comma-joined values (`brand=Apple,Samsung`)
//! and omits any key that is not set.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use url::form_urlencoded::Serializer;

/// Errors raised while parsing sort criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Sort criteria must look like `<key>_<asc|desc>`.
    #[error("sort criteria must contain exactly one underscore: {0}")]
    MalformedSort(String),

    /// Unknown sort key.
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Unknown sort direction.
    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::UnknownSortDirection(other.to_string())),
        }
    }
}

/// Field a listing can be sorted by.
pub trait SortKey: Copy + FromStr<Err = QueryError> {
    /// Name used in the `sortBy` parameter.
    fn as_str(&self) -> &'static str;
}

macro_rules! sort_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All keys, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl SortKey for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = QueryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(QueryError::UnknownSortKey(other.to_string())),
                }
            }
        }
    };
}

sort_keys!(
    /// Sortable product fields.
    ProductSortKey {
        Id => "id",
        Name => "name",
        Price => "price",
        Brand => "brand",
        Memory => "memory",
        ScreenSize => "screenSize",
        BatteryCapacity => "batteryCapacity",
        OperatingSystem => "operatingSystem",
        Color => "color",
        Ratings => "ratings",
    }
);

sort_keys!(
    /// Sortable order fields.
    OrderSortKey {
        Id => "id",
        CreatedAt => "createdAt",
        Status => "status",
        TotalPrice => "totalPrice",
    }
);

/// A sort key with its direction, written `<key>_<direction>` in menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortCriteria<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: SortKey> SortCriteria<K> {
    /// Parse `price_asc`-style criteria. An empty string means "unsorted".
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the input does not contain exactly one
    /// underscore or names an unknown key or direction.
    pub fn parse(s: &str) -> Result<Option<Self>, QueryError> {
        if s.is_empty() {
            return Ok(None);
        }

        let mut parts = s.split('_');
        let (Some(key), Some(direction), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(QueryError::MalformedSort(s.to_string()));
        };

        Ok(Some(Self {
            key: key.parse()?,
            direction: direction.parse()?,
        }))
    }
}

impl<K: SortKey> fmt::Display for SortCriteria<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key.as_str(), self.direction.as_str())
    }
}

/// A sort option offered in a sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption<K> {
    pub criteria: SortCriteria<K>,
    pub label: &'static str,
}

const fn option<K>(key: K, direction: SortDirection, label: &'static str) -> SortOption<K> {
    SortOption {
        criteria: SortCriteria { key, direction },
        label,
    }
}

/// Sort options of the product listing.
pub const PRODUCT_SORT_OPTIONS: [SortOption<ProductSortKey>; 5] = [
    option(ProductSortKey::Price, SortDirection::Asc, "Price: low to high"),
    option(ProductSortKey::Price, SortDirection::Desc, "Price: high to low"),
    option(ProductSortKey::Name, SortDirection::Asc, "Name: A to Z"),
    option(ProductSortKey::Name, SortDirection::Desc, "Name: Z to A"),
    option(ProductSortKey::Ratings, SortDirection::Desc, "Rating: high to low"),
];

/// Sort options of the order listings.
pub const ORDER_SORT_OPTIONS: [SortOption<OrderSortKey>; 6] = [
    option(OrderSortKey::CreatedAt, SortDirection::Asc, "Order date: oldest first"),
    option(OrderSortKey::CreatedAt, SortDirection::Desc, "Order date: newest first"),
    option(OrderSortKey::Status, SortDirection::Asc, "Status: pending first"),
    option(OrderSortKey::Status, SortDirection::Desc, "Status: declined first"),
    option(OrderSortKey::TotalPrice, SortDirection::Asc, "Total price: low to high"),
    option(OrderSortKey::TotalPrice, SortDirection::Desc, "Total price: high to low"),
];

/// Page selection and ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination<K> {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortCriteria<K>>,
}

impl<K> Default for Pagination<K> {
    fn default() -> Self {
        Self {
            page_number: None,
            page_size: None,
            sort: None,
        }
    }
}

impl<K: SortKey> Pagination<K> {
    /// Request page `page_number` (zero-based).
    #[must_use]
    pub const fn page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Request `page_size` items per page.
    #[must_use]
    pub const fn size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sort by `key` in `direction`.
    #[must_use]
    pub fn sorted(mut self, key: K, direction: SortDirection) -> Self {
        self.sort = Some(SortCriteria { key, direction });
        self
    }

    /// Append `pageNumber`, `pageSize`, `sortDir` and `sortBy`.
    pub fn append_to(&self, query: &mut Serializer<'_, String>) {
        if let Some(page_number) = self.page_number {
            query.append_pair("pageNumber", &page_number.to_string());
        }
        if let Some(page_size) = self.page_size {
            query.append_pair("pageSize", &page_size.to_string());
        }
        if let Some(sort) = &self.sort {
            query.append_pair("sortDir", sort.direction.as_str());
            query.append_pair("sortBy", sort.key.as_str());
        }
    }
}

/// Product filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub brand: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub color: Vec<String>,
    pub memory: Vec<String>,
    pub screen_size: Vec<String>,
    pub battery_capacity: Vec<String>,
    pub operating_system: Vec<String>,
    pub category: Vec<String>,
}

impl ProductFilter {
    /// Filter for a search by product name.
    #[must_use]
    pub fn search(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Filter for one category.
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: vec![category.into()],
            ..Self::default()
        }
    }

    /// Whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Append every set filter; list values are joined with commas.
    pub fn append_to(&self, query: &mut Serializer<'_, String>) {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            query.append_pair("name", name);
        }
        append_list(query, "brand", &self.brand);
        if let Some(min_price) = self.min_price {
            query.append_pair("minPrice", &min_price.normalize().to_string());
        }
        if let Some(max_price) = self.max_price {
            query.append_pair("maxPrice", &max_price.normalize().to_string());
        }
        append_list(query, "color", &self.color);
        append_list(query, "memory", &self.memory);
        append_list(query, "screenSize", &self.screen_size);
        append_list(query, "batteryCapacity", &self.battery_capacity);
        append_list(query, "operatingSystem", &self.operating_system);
        append_list(query, "category", &self.category);
    }
}

fn append_list(query: &mut Serializer<'_, String>, key: &str, values: &[String]) {
    if !values.is_empty() {
        query.append_pair(key, &values.join(","));
    }
}

/// Encode a product listing query.
#[must_use]
pub fn product_query(pagination: &Pagination<ProductSortKey>, filter: &ProductFilter) -> String {
    let mut query = Serializer::new(String::new());
    pagination.append_to(&mut query);
    filter.append_to(&mut query);
    query.finish()
}

/// Encode a filter-options query.
#[must_use]
pub fn filter_query(filter: &ProductFilter) -> String {
    let mut query = Serializer::new(String::new());
    filter.append_to(&mut query);
    query.finish()
}

/// Encode an order listing query.
#[must_use]
pub fn order_query(pagination: &Pagination<OrderSortKey>) -> String {
    let mut query = Serializer::new(String::new());
    pagination.append_to(&mut query);
    query.finish()
}
