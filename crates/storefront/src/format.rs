//! Text helpers for labels, dates and price ranges.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use volt_core::Price;

static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpeg|jpg|gif|png|svg|webp|bmp|tiff?)$").expect("Invalid regex")
});

static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("Invalid regex"));

/// Lower bound shown by an empty price filter.
pub const PRICE_FLOOR: Decimal = Decimal::ZERO;

/// Upper bound shown by an empty price filter.
pub const PRICE_CEILING: Decimal = Decimal::from_parts(999_999, 0, 0, false, 0);

/// `"laptop"` -> `"Laptop"`.
#[must_use]
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `"ScreenSize"` -> `"screenSize"`.
#[must_use]
pub fn decapitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// `"batteryCapacity"` -> `"battery Capacity"`.
#[must_use]
pub fn split_camel_case(s: &str) -> String {
    CAMEL_BOUNDARY_RE.replace_all(s, "$1 $2").into_owned()
}

/// Filter key shown as a heading: `"screenSize"` -> `"Screen Size"`.
#[must_use]
pub fn filter_label(key: &str) -> String {
    capitalize_first_letter(&split_camel_case(key))
}

/// Date part of an ISO-8601 timestamp as `DD/MM/YYYY`.
///
/// Accepts full RFC 3339 timestamps, timestamps without an offset and bare
/// dates. Returns `None` if no date can be read.
#[must_use]
pub fn extract_date(timestamp: &str) -> Option<String> {
    let timestamp = timestamp.trim();
    let date = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            let date_part = timestamp.split('T').next().unwrap_or(timestamp);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
        })?;

    Some(date.format("%d/%m/%Y").to_string())
}

/// Whether `url` ends with a common image file extension.
#[must_use]
pub fn is_image_url(url: &str) -> bool {
    IMAGE_URL_RE.is_match(url)
}

/// `1234` -> `"$1,234.00"`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::new(amount).to_string()
}

/// Lowest and highest of `prices`, or the full filter range when empty.
#[must_use]
pub fn price_bounds(prices: &[Price]) -> (Decimal, Decimal) {
    let min = prices.iter().map(Price::amount).min();
    let max = prices.iter().map(Price::amount).max();
    (min.unwrap_or(PRICE_FLOOR), max.unwrap_or(PRICE_CEILING))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalization() {
        assert_eq!(capitalize_first_letter("laptop"), "Laptop");
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(decapitalize_first_letter("ScreenSize"), "screenSize");
        assert_eq!(decapitalize_first_letter("É"), "é");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("batteryCapacity"), "battery Capacity");
        assert_eq!(split_camel_case("operatingSystem"), "operating System");
        assert_eq!(split_camel_case("TV"), "TV");
        assert_eq!(filter_label("screenSize"), "Screen Size");
    }

    #[test]
    fn test_extract_date() {
        assert_eq!(
            extract_date("2024-03-05T14:22:10.123Z").as_deref(),
            Some("05/03/2024")
        );
        assert_eq!(
            extract_date("2024-12-31T23:59:59.999999").as_deref(),
            Some("31/12/2024")
        );
        assert_eq!(extract_date("2024-01-02").as_deref(), Some("02/01/2024"));
        assert_eq!(extract_date("yesterday"), None);
    }

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("https://cdn.example.com/a/phone.PNG"));
        assert!(is_image_url("laptop.tif"));
        assert!(is_image_url("laptop.tiff"));
        assert!(!is_image_url("https://cdn.example.com/phone.png?w=200"));
        assert!(!is_image_url("https://cdn.example.com/readme.txt"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::from(1234)), "$1,234.00");
        assert_eq!(format_price(Decimal::new(5, 1)), "$0.50");
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(
            price_bounds(&[]),
            (Decimal::ZERO, Decimal::from(999_999))
        );

        let prices = [
            Price::from_cents(129_900),
            Price::from_cents(4_999),
            Price::from_cents(89_900),
        ];
        assert_eq!(
            price_bounds(&prices),
            (Decimal::new(4_999, 2), Decimal::new(129_900, 2))
        );
    }
}
