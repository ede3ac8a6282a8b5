//! Form validation.
//!
//! Every validator checks all fields and reports each failing one, so a
//! form can mark every bad field at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use volt_core::{Category, Email};

use crate::api::types::{
    ChangePasswordRequest, ProductRequest, RegisterRequest, UpdateUserDataRequest,
};
use crate::checkout::CheckoutForm;
use crate::format::is_image_url;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^05\d{8}$").expect("Invalid regex"));

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7}$").expect("Invalid regex"));

/// Characters of which a password needs at least one.
pub const PASSWORD_SPECIAL_CHARS: &str = "*!@$%^&_";

const PASSWORD_MESSAGE: &str = "Your password must be 8-32 characters long and include at least one lowercase letter, one uppercase letter, one digit, and one special character.";

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failing field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message reported for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was reported.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn require(&mut self, field: &'static str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
            false
        } else {
            true
        }
    }

    fn length(&mut self, field: &'static str, label: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.add(field, format!("{label} must be {min}-{max} characters long"));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// 8-32 characters with a digit, a lowercase letter, an uppercase letter
/// and one of [`PASSWORD_SPECIAL_CHARS`].
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    (8..=32).contains(&len)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c))
}

fn check_email(errors: &mut ValidationErrors, field: &'static str, email: &str) {
    if errors.require(field, "Email", email) && Email::parse(email.trim()).is_err() {
        errors.add(field, "Email must be valid");
    }
}

fn check_new_password(
    errors: &mut ValidationErrors,
    field: &'static str,
    confirm_field: &'static str,
    password: &str,
    confirmation: &str,
) {
    if errors.require(field, "Password", password) && !is_strong_password(password) {
        errors.add(field, PASSWORD_MESSAGE);
    }
    if password != confirmation {
        errors.add(confirm_field, "Passwords do not match");
    }
}

/// Validate the registration form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_register(request: &RegisterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("username", "Username", &request.username);
    check_email(&mut errors, "email", &request.email);
    check_new_password(
        &mut errors,
        "password",
        "confirmPassword",
        &request.password,
        &request.confirm_password,
    );
    if errors.require("image", "Image", &request.image) && !is_image_url(request.image.trim()) {
        errors.add("image", "Image must be a link to an image file");
    }
    errors.into_result()
}

/// Validate the login form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("username", "Username", username);
    errors.require("password", "Password", password);
    errors.into_result()
}

/// Validate the password change form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_change_password(request: &ChangePasswordRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("oldPassword", "Current password", &request.old_password);
    check_new_password(
        &mut errors,
        "newPassword",
        "confirmNewPassword",
        &request.new_password,
        &request.confirm_new_password,
    );
    errors.into_result()
}

/// Validate the profile form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_update_user(request: &UpdateUserDataRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("newUsername", "Username", &request.new_username);
    check_email(&mut errors, "email", &request.email);
    if !request.user_image.trim().is_empty() && !is_image_url(request.user_image.trim()) {
        errors.add("userImage", "Image must be a link to an image file");
    }
    errors.into_result()
}

/// Validate the product form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_product(request: &ProductRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.length("name", "Name", &request.name, 2, 30);
    errors.length("brand", "Brand", &request.brand, 2, 30);
    errors.length("description", "Description", &request.description, 2, 512);

    if errors.require("image", "Image", &request.image) && !is_image_url(request.image.trim()) {
        errors.add("image", "Image must be a link to an image file");
    }

    let price = request.price.amount();
    if price < Decimal::ONE || price > Decimal::from(99_999) {
        errors.add("price", "Price must be between 1 and 99999");
    }

    if errors.require("category", "Category", &request.category)
        && request.category.parse::<Category>().is_err()
    {
        errors.add("category", "Category must be one of Laptop, Cellular, TV, Headphone");
    }

    errors.into_result()
}

/// Validate the shipping part of the checkout form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_checkout(form: &CheckoutForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("address", "Address", &form.address);
    errors.require("city", "City", &form.city);
    if !POSTAL_CODE_RE.is_match(form.postal_code.trim()) {
        errors.add("postalCode", "Invalid postal code");
    }
    if !PHONE_RE.is_match(form.phone_number.trim()) {
        errors.add("phoneNumber", "Invalid phone number");
    }
    errors.into_result()
}

/// Validate a star rating.
///
/// # Errors
///
/// Returns an error unless `rating` is 1-5.
pub fn validate_rating(rating: u8) -> Result<u8, ValidationErrors> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        let mut errors = ValidationErrors::new();
        errors.add("rating", "Rating must be between 1 and 5");
        Err(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use volt_core::Price;

    use super::*;
    use crate::checkout::PaymentMethod;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "dana".to_string(),
            email: "dana@example.com".to_string(),
            password: "Secr3t_pass".to_string(),
            confirm_password: "Secr3t_pass".to_string(),
            image: "https://cdn.example.com/dana.png".to_string(),
        }
    }

    fn product_request() -> ProductRequest {
        ProductRequest {
            name: "Galaxy S24".to_string(),
            price: Price::from_cents(89_900),
            brand: "Samsung".to_string(),
            description: "A phone".to_string(),
            image: "https://cdn.example.com/s24.webp".to_string(),
            category: "Cellular".to_string(),
            memory: "256GB".to_string(),
            screen_size: "6.2".to_string(),
            battery_capacity: "4000".to_string(),
            operating_system: "Android".to_string(),
            color: "Black".to_string(),
        }
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Secr3t_pass"));
        assert!(!is_strong_password("Sh0rt_"));
        assert!(!is_strong_password("nouppercase1!"));
        assert!(!is_strong_password("NOLOWERCASE1!"));
        assert!(!is_strong_password("NoDigits!!"));
        assert!(!is_strong_password("NoSpecial123"));
        // '#' is not one of the accepted special characters
        assert!(!is_strong_password("Hash#Tag123"));
        assert!(!is_strong_password(&format!("Aa1!{}", "x".repeat(29))));
    }

    #[test]
    fn test_valid_register() {
        assert!(validate_register(&register_request()).is_ok());
    }

    #[test]
    fn test_register_reports_every_field() {
        let request = RegisterRequest {
            username: " ".to_string(),
            email: "dana@localhost".to_string(),
            password: "weak".to_string(),
            confirm_password: "other".to_string(),
            image: String::new(),
        };

        let errors = validate_register(&request).unwrap_err();
        assert_eq!(errors.message_for("username"), Some("Username is required"));
        assert_eq!(errors.message_for("email"), Some("Email must be valid"));
        assert_eq!(errors.message_for("password"), Some(PASSWORD_MESSAGE));
        assert_eq!(errors.message_for("confirmPassword"), Some("Passwords do not match"));
        assert_eq!(errors.message_for("image"), Some("Image is required"));
        assert_eq!(errors.errors().len(), 5);
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert!(validate_login("dana", "x").is_ok());
        let errors = validate_login("", "").unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            errors.to_string(),
            "username: Username is required; password: Password is required"
        );
    }

    #[test]
    fn test_change_password() {
        let mut request = ChangePasswordRequest {
            username: "dana".to_string(),
            old_password: "Old_pass1".to_string(),
            new_password: "New_pass1".to_string(),
            confirm_new_password: "New_pass1".to_string(),
        };
        assert!(validate_change_password(&request).is_ok());

        request.confirm_new_password = "New_pass2".to_string();
        let errors = validate_change_password(&request).unwrap_err();
        assert_eq!(
            errors.message_for("confirmNewPassword"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_update_user() {
        let request = UpdateUserDataRequest {
            old_username: "dana".to_string(),
            new_username: "dana2".to_string(),
            email: "dana@example.com".to_string(),
            user_image: String::new(),
        };
        assert!(validate_update_user(&request).is_ok());

        let request = UpdateUserDataRequest {
            user_image: "https://example.com/avatar".to_string(),
            ..request
        };
        assert!(validate_update_user(&request).unwrap_err().message_for("userImage").is_some());
    }

    #[test]
    fn test_valid_product() {
        assert!(validate_product(&product_request()).is_ok());
    }

    #[test]
    fn test_product_limits() {
        let request = ProductRequest {
            name: "X".to_string(),
            brand: "B".repeat(31),
            description: "d".repeat(513),
            image: "https://cdn.example.com/s24".to_string(),
            price: Price::from_cents(50),
            category: "Tablet".to_string(),
            ..product_request()
        };

        let errors = validate_product(&request).unwrap_err();
        for field in ["name", "brand", "description", "image", "price", "category"] {
            assert!(errors.message_for(field).is_some(), "expected error for {field}");
        }
    }

    #[test]
    fn test_product_price_bounds_are_inclusive() {
        let mut request = product_request();
        request.price = Price::from_cents(100);
        assert!(validate_product(&request).is_ok());
        request.price = Price::from_cents(9_999_900);
        assert!(validate_product(&request).is_ok());
        request.price = Price::from_cents(9_999_901);
        assert!(validate_product(&request).is_err());
    }

    #[test]
    fn test_category_accepts_api_names() {
        let mut request = product_request();
        request.category = "TV".to_string();
        assert!(validate_product(&request).is_ok());
    }

    #[test]
    fn test_checkout_form() {
        let mut form = CheckoutForm {
            address: "1 Main St".to_string(),
            city: "Haifa".to_string(),
            postal_code: "1234567".to_string(),
            phone_number: "0501234567".to_string(),
            payment: PaymentMethod::Cash,
        };
        assert!(validate_checkout(&form).is_ok());

        form.postal_code = "12345".to_string();
        form.phone_number = "0721234567".to_string();
        form.city = String::new();
        let errors = validate_checkout(&form).unwrap_err();
        assert_eq!(errors.message_for("postalCode"), Some("Invalid postal code"));
        assert_eq!(errors.message_for("phoneNumber"), Some("Invalid phone number"));
        assert_eq!(errors.message_for("city"), Some("City is required"));
    }

    #[test]
    fn test_rating_range() {
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
