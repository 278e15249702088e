//! Point-in-time views of the cart.

use serde::Serialize;

use crate::cart::{totals, CartLineItem};
use crate::ids::ItemIdentity;
use crate::money::{Currency, Money};

/// Immutable view of the cart's items and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub items: Vec<CartLineItem>,
    /// Sum of quantities.
    pub total_items: i64,
    /// Sum of line totals.
    pub total_price: Money,
    /// Number of mutations the store had applied when this was taken.
    pub version: u64,
}

impl CartSnapshot {
    /// Build a snapshot, computing totals from `items`.
    pub fn new(items: Vec<CartLineItem>, currency: Currency, version: u64) -> Self {
        let total_items = totals::total_items(&items);
        let total_price = totals::total_price(&items, currency);
        Self {
            items,
            total_items,
            total_price,
            version,
        }
    }

    /// An empty cart.
    pub fn empty(currency: Currency) -> Self {
        Self::new(Vec::new(), currency, 0)
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line stored under `identity`, if any.
    pub fn item(&self, identity: &ItemIdentity) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.identity() == identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Customization;
    use crate::ids::ProductId;

    #[test]
    fn test_empty_snapshot() {
        let snap = CartSnapshot::empty(Currency::USD);
        assert!(snap.is_empty());
        assert_eq!(snap.total_items, 0);
        assert!(snap.total_price.is_zero());
    }

    #[test]
    fn test_snapshot_lookup() {
        let item = CartLineItem {
            product_id: ProductId::new("p1"),
            display_name: "Mug".into(),
            image_ref: None,
            unit_price: Money::new(250, Currency::USD),
            quantity: 2,
            customization: Customization::new().with("color", "red"),
            customization_cost: None,
        };
        let id = item.identity();
        let snap = CartSnapshot::new(vec![item], Currency::USD, 4);

        assert_eq!(snap.unique_item_count(), 1);
        assert_eq!(snap.total_items, 2);
        assert_eq!(snap.total_price.amount_cents, 500);
        assert_eq!(snap.item(&id).map(|i| i.quantity), Some(2));
        assert!(snap.item(&ItemIdentity::new("p1")).is_none());
    }
}
