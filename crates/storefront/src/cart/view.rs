//! Cart display data.
//!
//! The cart stores product ids only, so rendering it means resolving each id
//! through the API. Lines whose product cannot be fetched (deleted, network
//! failure) are listed separately instead of failing the whole view.

use std::collections::HashMap;

use secrecy::SecretString;
use tracing::{instrument, warn};
use volt_core::{CartEntry, Price, ProductId};

use super::ShoppingCart;
use crate::api::ApiClient;
use crate::api::types::Product;

/// One resolved cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_price: Price,
    /// Whether the quantity control may go up.
    pub can_increase: bool,
}

/// Resolved cart for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Price,
    pub item_count: u32,
    /// Entries whose product could not be resolved.
    pub unavailable: Vec<CartEntry>,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the view from the cart and already-fetched products.
    #[must_use]
    pub fn build(cart: &ShoppingCart, products: &HashMap<ProductId, Product>) -> Self {
        let mut view = Self::empty();

        for entry in cart.entries() {
            match products.get(&entry.product_id) {
                Some(product) => view.items.push(CartItemView::new(entry, product)),
                None => view.unavailable.push(*entry),
            }
        }

        view.subtotal = view.items.iter().map(|item| item.line_price).sum();
        view.item_count = view.items.iter().map(|item| item.quantity).sum();
        view
    }

    /// Fetch every product in the cart and build the view.
    ///
    /// Products are looked up one at a time; repeated lookups hit the
    /// client's product cache.
    #[instrument(skip_all, fields(entries = cart.entries().len()))]
    pub async fn resolve(cart: &ShoppingCart, api: &ApiClient, token: &SecretString) -> Self {
        let mut products = HashMap::with_capacity(cart.entries().len());

        for entry in cart.entries() {
            match api.fetch_product(token, entry.product_id).await {
                Ok(product) => {
                    products.insert(entry.product_id, product);
                }
                Err(e) => {
                    warn!(product_id = %entry.product_id, error = %e, "Failed to resolve cart product");
                }
            }
        }

        Self::build(cart, &products)
    }

    /// Whether the view has nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.unavailable.is_empty()
    }
}

impl CartItemView {
    fn new(entry: &CartEntry, product: &Product) -> Self {
        Self {
            product_id: entry.product_id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            quantity: entry.quantity,
            unit_price: product.price,
            line_price: product.price * entry.quantity,
            can_increase: entry.can_increase(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::types::tests::sample_product;
    use crate::storage::MemoryStore;

    #[test]
    fn test_build_prices_lines_and_subtotal() {
        let mut cart = ShoppingCart::load(Arc::new(MemoryStore::new()));
        cart.increase(ProductId::new(1)).unwrap();
        cart.increase(ProductId::new(1)).unwrap();
        cart.increase(ProductId::new(2)).unwrap();

        let products = HashMap::from([
            (ProductId::new(1), sample_product(1, Price::from_cents(10_000))),
            (ProductId::new(2), sample_product(2, Price::from_cents(2_550))),
        ]);

        let view = CartView::build(&cart, &products);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].line_price, Price::from_cents(20_000));
        assert_eq!(view.subtotal, Price::from_cents(22_550));
        assert_eq!(view.item_count, 3);
        assert!(view.unavailable.is_empty());
    }

    #[test]
    fn test_build_lists_unresolved_entries() {
        let mut cart = ShoppingCart::load(Arc::new(MemoryStore::new()));
        cart.increase(ProductId::new(1)).unwrap();
        cart.increase(ProductId::new(99)).unwrap();

        let products = HashMap::from([(ProductId::new(1), sample_product(1, Price::from_cents(100)))]);

        let view = CartView::build(&cart, &products);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.unavailable, vec![CartEntry::new(ProductId::new(99))]);
        assert_eq!(view.subtotal, Price::from_cents(100));
        assert!(!view.is_empty());
    }

    #[test]
    fn test_empty_view() {
        let cart = ShoppingCart::load(Arc::new(MemoryStore::new()));
        let view = CartView::build(&cart, &HashMap::new());
        assert!(view.is_empty());
        assert_eq!(view, CartView::empty());
    }
}
