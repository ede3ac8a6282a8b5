//! Integration tests for state that survives a client restart.
//!
//! Every test opens the storage file, changes something, drops the state and
//! opens the file again, which is what a second `volt` invocation does.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use volt_core::{CartEntry, ProductId};
use volt_integration_tests::TestStorage;
use volt_storefront::cart::{CartError, ShoppingCart};
use volt_storefront::checkout::{CheckoutError, CheckoutForm, PaymentMethod, submit_order};
use volt_storefront::preferences::{Theme, ThemePreference};
use volt_storefront::session::AuthSession;
use volt_storefront::storage::keys;

fn id(n: i64) -> ProductId {
    ProductId::new(n)
}

fn entry(n: i64, quantity: u32) -> CartEntry {
    CartEntry::with_quantity(id(n), quantity)
}

/// Parse the JSON string the cart is stored as.
fn stored_cart(storage: &TestStorage) -> Value {
    let contents = storage.contents();
    let raw = contents["shopping-cart"]
        .as_str()
        .expect("Cart is stored as a JSON string");
    serde_json::from_str(raw).expect("Stored cart is not JSON")
}

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_cart_survives_restart() {
    let storage = TestStorage::new();

    {
        let mut cart = ShoppingCart::load(storage.open());
        cart.increase(id(42)).expect("Failed to add product");
        cart.increase(id(42)).expect("Failed to add product");
        cart.increase(id(7)).expect("Failed to add product");
        assert_eq!(cart.entries(), [entry(42, 2), entry(7, 1)]);
        assert_eq!(cart.quantity_total(), 3);
    }

    let mut cart = ShoppingCart::load(storage.open());
    assert_eq!(cart.entries(), [entry(42, 2), entry(7, 1)]);

    cart.decrease(id(42)).expect("Failed to decrease");
    assert_eq!(cart.entries(), [entry(42, 1), entry(7, 1)]);

    cart.remove(id(7)).expect("Failed to remove");
    drop(cart);

    let cart = ShoppingCart::load(storage.open());
    assert_eq!(cart.entries(), [entry(42, 1)]);
    assert_eq!(stored_cart(&storage), json!([{"id": 42, "quantity": 1}]));
}

#[test]
fn test_cart_limit_is_not_persisted_past_max() {
    let storage = TestStorage::new();

    let mut cart = ShoppingCart::load(storage.open());
    for _ in 0..CartEntry::MAX_QUANTITY {
        cart.increase(id(3)).expect("Failed to add product");
    }
    let err = cart.increase(id(3)).expect_err("Sixth unit should be refused");
    assert!(matches!(err, CartError::QuantityLimit { .. }));
    drop(cart);

    let cart = ShoppingCart::load(storage.open());
    assert_eq!(cart.quantity(id(3)), CartEntry::MAX_QUANTITY);
}

#[test]
fn test_cleared_cart_is_stored_empty() {
    let storage = TestStorage::new();

    let mut cart = ShoppingCart::load(storage.open());
    cart.increase(id(1)).expect("Failed to add product");
    cart.clear().expect("Failed to clear");
    drop(cart);

    assert!(ShoppingCart::load(storage.open()).is_empty());
    assert_eq!(stored_cart(&storage), json!([]));
}

#[test]
fn test_stored_cart_is_repaired_on_load() {
    let storage = TestStorage::new();
    let stored = json!([
        {"id": 1, "quantity": 0},
        {"id": 2, "quantity": 9},
        {"id": 2, "quantity": 1},
        {"id": 3, "quantity": 2}
    ]);
    std::fs::write(
        storage.path(),
        json!({"shopping-cart": stored.to_string()}).to_string(),
    )
    .expect("Failed to write store file");

    let mut cart = ShoppingCart::load(storage.open());
    assert_eq!(cart.entries(), [entry(2, 5), entry(3, 2)]);

    // Repairs are written with the next change.
    cart.decrease(id(3)).expect("Failed to decrease");
    assert_eq!(
        stored_cart(&storage),
        json!([{"id": 2, "quantity": 5}, {"id": 3, "quantity": 1}])
    );
}

// ============================================================================
// Malformed storage
// ============================================================================

#[test]
fn test_malformed_values_fall_back() {
    let storage = TestStorage::new();
    std::fs::write(
        storage.path(),
        json!({"shopping-cart": "not json", "theme": "purple", "token": ""}).to_string(),
    )
    .expect("Failed to write store file");

    let app = storage.app();
    assert!(app.cart().is_empty());
    assert_eq!(app.theme().theme(), Theme::Light);
    assert!(!app.session().is_logged_in());
}

#[test]
fn test_unreadable_file_is_replaced_on_write() {
    let storage = TestStorage::new();
    std::fs::write(storage.path(), "{ this is not json").expect("Failed to write store file");

    let mut cart = ShoppingCart::load(storage.open());
    assert!(cart.is_empty());
    cart.increase(id(9)).expect("Failed to add product");

    assert_eq!(stored_cart(&storage), json!([{"id": 9, "quantity": 1}]));
}

#[test]
fn test_store_file_parent_is_created() {
    let storage = TestStorage::new();
    let nested = storage.dir().join("nested").join("storage.json");

    let store = std::sync::Arc::new(
        volt_storefront::storage::FileStore::open(&nested).expect("Failed to open store"),
    );
    let mut cart = ShoppingCart::load(store);
    cart.increase(id(5)).expect("Failed to add product");

    assert!(nested.exists());
}

// ============================================================================
// Theme & session
// ============================================================================

#[test]
fn test_theme_survives_restart() {
    let storage = TestStorage::new();

    let mut theme = ThemePreference::load(storage.open());
    assert_eq!(theme.theme(), Theme::Light);
    assert_eq!(theme.toggle().expect("Failed to toggle"), Theme::Dark);
    drop(theme);

    assert!(ThemePreference::load(storage.open()).is_dark());
    assert_eq!(storage.contents()["theme"], "dark");
}

#[test]
fn test_session_survives_restart_until_logout() {
    let storage = TestStorage::new();

    let mut session = AuthSession::load(storage.open());
    assert!(!session.is_logged_in());
    session
        .login(SecretString::from("header.payload.signature"))
        .expect("Failed to store token");
    drop(session);

    let mut session = AuthSession::load(storage.open());
    let token = session.require_token().expect("Token should be restored");
    assert_eq!(token.expose_secret(), "header.payload.signature");

    session.logout().expect("Failed to remove token");
    drop(session);

    assert!(!AuthSession::load(storage.open()).is_logged_in());
    assert!(storage.contents().get("token").is_none());
}

#[test]
fn test_cart_theme_and_token_share_one_file() {
    let storage = TestStorage::new();

    {
        let mut app = storage.app();
        app.cart_mut().increase(id(11)).expect("Failed to add product");
        app.theme_mut().set(Theme::Dark).expect("Failed to set theme");
        app.session_mut()
            .login(SecretString::from("jwt"))
            .expect("Failed to store token");
    }

    let app = storage.app();
    assert_eq!(app.cart().quantity(id(11)), 1);
    assert!(app.theme().is_dark());
    assert!(app.session().is_logged_in());
}

#[tokio::test]
async fn test_empty_cart_view_needs_no_login() {
    let storage = TestStorage::new();
    let app = storage.app();

    let view = app.cart_view().await.expect("Empty cart needs no token");
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_checkout_with_empty_cart_writes_nothing() {
    let storage = TestStorage::new();
    let mut app = storage.app();
    let api = app.api().clone();

    let form = CheckoutForm {
        address: "1 Main Street".to_string(),
        city: "Tel Aviv".to_string(),
        postal_code: "1234567".to_string(),
        phone_number: "0521234567".to_string(),
        payment: PaymentMethod::Cash,
    };
    let err = submit_order(app.cart_mut(), &api, &SecretString::from("jwt"), &form)
        .await
        .expect_err("Empty cart should be refused");
    assert!(matches!(err, CheckoutError::EmptyCart));

    let stored = app.store().get_item(keys::SHOPPING_CART).expect("Readable store");
    assert!(stored.is_none());
}
