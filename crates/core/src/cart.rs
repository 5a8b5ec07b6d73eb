//! Shopping cart arithmetic.

use serde::{Deserialize, Serialize};

use crate::pricing::{license_price, LicenseTier};
use crate::types::{Amount, DocId};

/// One priced line of a cart or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub beat_id: DocId,
    pub title: String,
    pub license: LicenseTier,
    pub price: Amount,
}

impl CartItem {
    /// Build a line priced from the beat's base price.
    pub fn priced(
        beat_id: impl Into<DocId>,
        title: impl Into<String>,
        base_price: Amount,
        license: LicenseTier,
    ) -> Self {
        Self {
            beat_id: beat_id.into(),
            title: title.into(),
            license,
            price: license_price(base_price, license),
        }
    }
}

/// Sum of line prices. No tax or currency conversion.
pub fn cart_total(items: &[CartItem]) -> Amount {
    items.iter().map(|item| item.price).sum()
}

/// A cart holds at most one line per beat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line. A beat already in the cart has its line replaced.
    pub fn add(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|i| i.beat_id == item.beat_id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Remove the line for `beat_id`, returning it.
    pub fn remove(&mut self, beat_id: &str) -> Option<CartItem> {
        let pos = self.items.iter().position(|i| i.beat_id == beat_id)?;
        Some(self.items.remove(pos))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Amount {
        cart_total(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_reflects_scaled_item_prices() {
        let mut cart = Cart::new();
        cart.add(CartItem::priced("b1", "Night Drive", 29.0, LicenseTier::Basic));
        cart.add(CartItem::priced("b2", "Sunset", 39.0, LicenseTier::Premium));
        assert_eq!(cart.items()[1].price, 58.5);
        assert_eq!(cart.total(), 87.5);
    }

    #[test]
    fn removing_lowers_total_by_item_price() {
        let mut cart = Cart::new();
        cart.add(CartItem::priced("b1", "A", 20.0, LicenseTier::Exclusive));
        cart.add(CartItem::priced("b2", "B", 10.0, LicenseTier::Basic));
        let before = cart.total();
        let removed = cart.remove("b1").unwrap();
        assert_eq!(before - removed.price, cart.total());
        assert_eq!(cart.len(), 1);
        assert!(cart.remove("missing").is_none());
    }

    #[test]
    fn adding_same_beat_replaces_line() {
        let mut cart = Cart::new();
        cart.add(CartItem::priced("b1", "A", 20.0, LicenseTier::Basic));
        cart.add(CartItem::priced("b1", "A", 20.0, LicenseTier::Premium));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), 30.0);
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(cart_total(&[]), 0.0);
        assert!(Cart::new().is_empty());
    }
}
