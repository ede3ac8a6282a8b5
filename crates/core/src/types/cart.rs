//! Shopping cart line type.

use serde::{Deserialize, Serialize};

use crate::ProductId;

/// One product line in the shopping cart.
///
/// The cart only holds the product id, never a copy of the product itself.
/// Product details are resolved on demand so renames, price changes and
/// deletions show up immediately.
///
/// Serialized as `{"id": 42, "quantity": 2}`, the layout persisted under the
/// `shopping-cart` key.
///
/// ## Constraints
///
/// - `quantity` is between [`CartEntry::MIN_QUANTITY`] and
///   [`CartEntry::MAX_QUANTITY`]; an entry never reaches zero, it is removed
///   from the cart instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product this line refers to.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: u32,
}

impl CartEntry {
    /// Smallest quantity a cart line may hold.
    pub const MIN_QUANTITY: u32 = 1;

    /// Largest quantity a cart line may hold.
    pub const MAX_QUANTITY: u32 = 5;

    /// Create a new line with a single unit.
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: Self::MIN_QUANTITY,
        }
    }

    /// Create a line with an explicit quantity.
    #[must_use]
    pub const fn with_quantity(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Whether one more unit may be added without exceeding the limit.
    #[must_use]
    pub const fn can_increase(&self) -> bool {
        self.quantity < Self::MAX_QUANTITY
    }

    /// Whether the quantity is within the allowed bounds.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.quantity >= Self::MIN_QUANTITY && self.quantity <= Self::MAX_QUANTITY
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_id_key() {
        let entry = CartEntry::with_quantity(ProductId::new(42), 2);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":42,"quantity":2}"#);
    }

    #[test]
    fn test_deserializes_stored_layout() {
        let entries: Vec<CartEntry> =
            serde_json::from_str(r#"[{"id":42,"quantity":2},{"id":7,"quantity":1}]"#).unwrap();
        assert_eq!(
            entries,
            vec![
                CartEntry::with_quantity(ProductId::new(42), 2),
                CartEntry::new(ProductId::new(7)),
            ]
        );
    }

    #[test]
    fn test_quantity_bounds() {
        let id = ProductId::new(1);
        assert!(CartEntry::new(id).can_increase());
        assert!(!CartEntry::with_quantity(id, 5).can_increase());
        assert!(CartEntry::with_quantity(id, 5).is_valid());
        assert!(!CartEntry::with_quantity(id, 0).is_valid());
        assert!(!CartEntry::with_quantity(id, 6).is_valid());
    }
}
