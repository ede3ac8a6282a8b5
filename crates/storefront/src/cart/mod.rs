//! Shopping cart state.
//!
//! The cart is the client-side record of which products, and how many of
//! each, the user intends to buy. It holds product ids only; product details
//! are resolved through the API when a view needs them (see [`view`]).
//!
//! Per product the cart is a small state machine:
//!
//! ```text
//! Absent --increase--> Present(1)
//! Present(n) --increase--> Present(n + 1)      n < 5, else QuantityLimit
//! Present(1) --decrease--> Absent
//! Present(n) --decrease--> Present(n - 1)      n > 1
//! Present(n) --remove--> Absent
//! ```
//!
//! Entries are persisted under [`keys::SHOPPING_CART`] after every change.
//! The open/closed flag of the cart drawer is never persisted.

pub mod view;

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};
use volt_core::{CartEntry, ProductId};

use crate::api::types::OrderLine;
use crate::storage::{PersistenceError, PersistentValue, SharedStore, keys};

pub use view::{CartItemView, CartView};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product already has the maximum quantity.
    #[error("product {product_id} is limited to {max} units per order")]
    QuantityLimit { product_id: ProductId, max: u32 },

    /// The change was applied in memory but could not be saved.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Shopping cart bound to the local store.
///
/// Construct one per application run with [`ShoppingCart::load`] and hand
/// `&mut` access to whatever needs to change it.
#[derive(Debug)]
pub struct ShoppingCart {
    entries: PersistentValue<Vec<CartEntry>>,
    is_open: bool,
}

impl ShoppingCart {
    /// Load the cart from `store`.
    ///
    /// Absent or malformed data yields an empty cart. Stored entries that
    /// break the cart's rules (zero quantity, more than the maximum, the same
    /// product twice) are repaired in memory and logged; the store is
    /// rewritten on the next mutation.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        let mut entries = PersistentValue::load_or_else(store, keys::SHOPPING_CART, Vec::new);

        let repaired = repair_entries(entries.get());
        if repaired != *entries.get() {
            warn!(
                stored = entries.get().len(),
                kept = repaired.len(),
                "Repaired stored cart entries"
            );
            entries.set_unsaved(repaired);
        }

        Self {
            entries,
            is_open: false,
        }
    }

    /// Current entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        self.entries.get()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.get().is_empty()
    }

    /// Quantity of `product_id` in the cart, or 0 if absent.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.find(product_id).map_or(0, |entry| entry.quantity)
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn quantity_total(&self) -> u32 {
        self.entries.get().iter().map(|entry| entry.quantity).sum()
    }

    /// Whether [`increase`](Self::increase) would succeed for `product_id`.
    #[must_use]
    pub fn can_increase(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_none_or(CartEntry::can_increase)
    }

    /// Add one unit of `product_id`, inserting it if absent.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityLimit`] if the product is already at the
    ///   maximum; nothing changes and nothing is written.
    /// - [`CartError::Persistence`] if the write fails; the change stays
    ///   applied in memory.
    pub fn increase(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        if !self.can_increase(product_id) {
            return Err(CartError::QuantityLimit {
                product_id,
                max: CartEntry::MAX_QUANTITY,
            });
        }

        let quantity = self.entries.update(|entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.product_id == product_id) {
                entry.quantity += 1;
                entry.quantity
            } else {
                entries.push(CartEntry::new(product_id));
                CartEntry::MIN_QUANTITY
            }
        })?;

        debug!(%product_id, quantity, "Cart quantity increased");
        Ok(quantity)
    }

    /// Remove one unit of `product_id`; the entry is dropped when it reaches
    /// zero. Absent products are left alone.
    ///
    /// Returns the new quantity (0 if the entry is gone or was absent).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the write fails; the change
    /// stays applied in memory.
    pub fn decrease(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let Some(current) = self.find(product_id).map(|entry| entry.quantity) else {
            return Ok(0);
        };

        let quantity = self.entries.update(|entries| {
            if current <= CartEntry::MIN_QUANTITY {
                entries.retain(|e| e.product_id != product_id);
                0
            } else {
                let mut quantity = 0;
                for entry in entries.iter_mut().filter(|e| e.product_id == product_id) {
                    entry.quantity -= 1;
                    quantity = entry.quantity;
                }
                quantity
            }
        })?;

        debug!(%product_id, quantity, "Cart quantity decreased");
        Ok(quantity)
    }

    /// Delete the entry for `product_id` regardless of its quantity.
    ///
    /// Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the write fails; the entry stays
    /// removed in memory.
    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, CartError> {
        if self.find(product_id).is_none() {
            return Ok(false);
        }

        self.entries
            .update(|entries| entries.retain(|e| e.product_id != product_id))?;

        debug!(%product_id, "Cart entry removed");
        Ok(true)
    }

    /// Remove every entry with a single write.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the write fails; the cart stays
    /// empty in memory.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.entries.set(Vec::new())?;
        debug!("Cart cleared");
        Ok(())
    }

    /// Lines to send with an order request.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.entries
            .get()
            .iter()
            .map(|entry| OrderLine {
                product_id: entry.product_id,
                quantity: entry.quantity,
            })
            .collect()
    }

    /// Show the cart drawer.
    pub const fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the cart drawer.
    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Whether the cart drawer is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    fn find(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries
            .get()
            .iter()
            .find(|entry| entry.product_id == product_id)
    }
}

/// Drop zero quantities and repeated products, clamp to the maximum.
fn repair_entries(entries: &[CartEntry]) -> Vec<CartEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.quantity >= CartEntry::MIN_QUANTITY)
        .filter(|entry| seen.insert(entry.product_id))
        .map(|entry| CartEntry {
            quantity: entry.quantity.min(CartEntry::MAX_QUANTITY),
            ..*entry
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn entry(n: i64, quantity: u32) -> CartEntry {
        CartEntry::with_quantity(id(n), quantity)
    }

    fn empty_cart() -> (Arc<MemoryStore>, ShoppingCart) {
        let store = Arc::new(MemoryStore::new());
        let cart = ShoppingCart::load(store.clone());
        (store, cart)
    }

    fn assert_total_matches(cart: &ShoppingCart) {
        let sum: u32 = cart.entries().iter().map(|e| e.quantity).sum();
        assert_eq!(cart.quantity_total(), sum);
    }

    #[test]
    fn test_quantity_of_absent_product_is_zero() {
        let (_, cart) = empty_cart();
        assert_eq!(cart.quantity(id(1)), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_total(), 0);
    }

    #[test]
    fn test_increase_counts_up_to_limit() {
        let (_, mut cart) = empty_cart();
        for expected in 1..=CartEntry::MAX_QUANTITY {
            assert_eq!(cart.increase(id(3)).unwrap(), expected);
            assert_eq!(cart.quantity(id(3)), expected);
        }
        assert!(!cart.can_increase(id(3)));
    }

    #[test]
    fn test_increase_past_limit_is_rejected_without_write() {
        let (store, mut cart) = empty_cart();
        for _ in 0..CartEntry::MAX_QUANTITY {
            cart.increase(id(3)).unwrap();
        }
        let before = store.get_item(keys::SHOPPING_CART).unwrap();

        let err = cart.increase(id(3)).unwrap_err();
        assert!(matches!(
            err,
            CartError::QuantityLimit { product_id, max: 5 } if product_id == id(3)
        ));
        assert_eq!(cart.quantity(id(3)), 5);
        assert_eq!(store.get_item(keys::SHOPPING_CART).unwrap(), before);
    }

    #[test]
    fn test_decrease_at_one_removes_entry() {
        let (_, mut cart) = empty_cart();
        cart.increase(id(8)).unwrap();
        assert_eq!(cart.decrease(id(8)).unwrap(), 0);
        assert_eq!(cart.quantity(id(8)), 0);
        assert!(cart.entries().iter().all(|e| e.product_id != id(8)));
    }

    #[test]
    fn test_decrease_absent_is_noop() {
        let (store, mut cart) = empty_cart();
        cart.increase(id(1)).unwrap();
        let before = cart.entries().to_vec();

        assert_eq!(cart.decrease(id(2)).unwrap(), 0);
        assert_eq!(cart.entries(), before.as_slice());
        assert_eq!(
            store.get_item(keys::SHOPPING_CART).unwrap().as_deref(),
            Some(r#"[{"id":1,"quantity":1}]"#)
        );
    }

    #[test]
    fn test_remove_ignores_quantity() {
        let (_, mut cart) = empty_cart();
        for _ in 0..4 {
            cart.increase(id(5)).unwrap();
        }
        assert!(cart.remove(id(5)).unwrap());
        assert_eq!(cart.quantity(id(5)), 0);
        assert!(!cart.remove(id(5)).unwrap());
    }

    #[test]
    fn test_documented_scenario() {
        let (_, mut cart) = empty_cart();
        cart.increase(id(42)).unwrap();
        cart.increase(id(42)).unwrap();
        cart.increase(id(7)).unwrap();
        assert_eq!(cart.entries(), &[entry(42, 2), entry(7, 1)]);
        assert_eq!(cart.quantity_total(), 3);

        cart.decrease(id(42)).unwrap();
        assert_eq!(cart.entries(), &[entry(42, 1), entry(7, 1)]);

        cart.remove(id(7)).unwrap();
        assert_eq!(cart.entries(), &[entry(42, 1)]);
        assert_total_matches(&cart);
    }

    #[test]
    fn test_total_tracks_every_operation() {
        let (_, mut cart) = empty_cart();
        let ops: [(char, i64); 10] = [
            ('+', 1),
            ('+', 2),
            ('+', 1),
            ('-', 2),
            ('+', 3),
            ('x', 1),
            ('-', 9),
            ('+', 3),
            ('+', 3),
            ('-', 3),
        ];
        for (op, n) in ops {
            match op {
                '+' => {
                    cart.increase(id(n)).unwrap();
                }
                '-' => {
                    cart.decrease(id(n)).unwrap();
                }
                _ => {
                    cart.remove(id(n)).unwrap();
                }
            }
            assert_total_matches(&cart);
        }
        assert_eq!(cart.entries(), &[entry(3, 2)]);
    }

    #[test]
    fn test_reload_restores_entries_in_order() {
        let (store, mut cart) = empty_cart();
        cart.increase(id(9)).unwrap();
        cart.increase(id(4)).unwrap();
        cart.increase(id(9)).unwrap();
        cart.open();

        let reloaded = ShoppingCart::load(store);
        assert_eq!(reloaded.entries(), cart.entries());
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_malformed_store_loads_empty() {
        let store = Arc::new(MemoryStore::with_items([(
            keys::SHOPPING_CART,
            r#"{"id": 1, "quantity": 2}"#,
        )]));
        let cart = ShoppingCart::load(store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invalid_stored_entries_are_repaired() {
        let store = Arc::new(MemoryStore::with_items([(
            keys::SHOPPING_CART,
            r#"[{"id":1,"quantity":0},{"id":2,"quantity":9},{"id":3,"quantity":2},{"id":2,"quantity":1}]"#,
        )]));
        let cart = ShoppingCart::load(store);
        assert_eq!(cart.entries(), &[entry(2, 5), entry(3, 2)]);
    }

    #[test]
    fn test_persistence_failure_is_reported() {
        let store = Arc::new(MemoryStore::with_quota(4));
        let mut cart = ShoppingCart::load(store.clone());

        let err = cart.increase(id(1)).unwrap_err();
        assert!(matches!(
            err,
            CartError::Persistence(PersistenceError::Storage {
                source: StorageError::QuotaExceeded { .. },
                ..
            })
        ));
        // Applied in memory, missing from the store.
        assert_eq!(cart.quantity(id(1)), 1);
        assert_eq!(store.get_item(keys::SHOPPING_CART).unwrap(), None);
    }

    #[test]
    fn test_clear_and_order_lines() {
        let (store, mut cart) = empty_cart();
        cart.increase(id(1)).unwrap();
        cart.increase(id(2)).unwrap();
        cart.increase(id(2)).unwrap();

        let lines = cart.order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].product_id, id(2));
        assert_eq!(lines[1].quantity, 2);

        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert_eq!(
            store.get_item(keys::SHOPPING_CART).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_open_close_flag() {
        let (_, mut cart) = empty_cart();
        assert!(!cart.is_open());
        cart.open();
        assert!(cart.is_open());
        cart.close();
        assert!(!cart.is_open());
    }
}
