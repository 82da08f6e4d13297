//! Cart Aggregate
//!
//! The cart is a pure state container: every change goes through [`Cart::apply`]
//! with a [`CartAction`]. Persistence lives in [`crate::cart`].

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::product::{ProductSnapshot, VariantSnapshot};
use crate::domain::value_objects::{Money, Quantity};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductSnapshot,
    pub variant: VariantSnapshot,
    pub quantity: Quantity,
}

impl CartItem {
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity.value()) }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    Add(CartItem),
    Remove { variant_id: i64 },
    UpdateQuantity { variant_id: i64, quantity: i64 },
    Clear,
}

impl Cart {
    pub fn new() -> Self { Self::default() }
    pub fn from_items(items: Vec<CartItem>) -> Self { Self { items } }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn subtotal(&self) -> Money { self.items.iter().map(CartItem::line_total).sum() }

    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(item) => self.add_item(item),
            CartAction::Remove { variant_id } => self.remove_item(variant_id),
            CartAction::UpdateQuantity { variant_id, quantity } => self.update_quantity(variant_id, quantity),
            CartAction::Clear => self.clear(),
        }
    }

    /// Merges into the line holding the same variant id, otherwise appends.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.variant.id == item.variant.id) {
            existing.quantity = existing.quantity.add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Lines reaching zero stay in the cart until removed.
    pub fn update_quantity(&mut self, variant_id: i64, quantity: i64) {
        let quantity = Quantity::clamped(quantity);
        for item in self.items.iter_mut().filter(|i| i.variant.id == Some(variant_id)) {
            item.quantity = quantity;
        }
    }

    pub fn remove_item(&mut self, variant_id: i64) { self.items.retain(|i| i.variant.id != Some(variant_id)); }

    pub fn clear(&mut self) { self.items.clear(); }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn item(variant_id: Option<i64>, quantity: u32, price: &str) -> CartItem {
        CartItem {
            product: ProductSnapshot { id: variant_id.unwrap_or(0) * 10, name: format!("Tee {}", variant_id.unwrap_or(0)), price: price.parse().unwrap(), images: vec![] },
            variant: VariantSnapshot { id: variant_id, color: "Black".into(), size: "M".into(), cost: "4.00".parse().unwrap(), image: None },
            quantity: Quantity::new(quantity),
        }
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(item(Some(1), 2, "10.00")));
        cart.apply(CartAction::Add(item(Some(2), 1, "25.00")));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().to_string(), "45.00");
        cart.apply(CartAction::Add(item(Some(1), 1, "10.00")));
        assert_eq!(cart.items()[0].quantity.value(), 3); // Merged
    }

    #[test]
    fn test_adding_same_variant_twice_merges() {
        let mut cart = Cart::new();
        cart.add_item(item(Some(5), 1, "9.00"));
        cart.add_item(item(Some(5), 1, "9.00"));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].variant.id, Some(5));
        assert_eq!(cart.items()[0].quantity.value(), 2);
    }

    #[test]
    fn test_merge_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(item(Some(5), 1, "9.00"));
        cart.add_item(item(Some(5), 1, "12.00"));
        assert_eq!(cart.items()[0].product.price.to_string(), "9.00");
    }

    #[test]
    fn test_update_to_zero_keeps_line() {
        let mut cart = Cart::from_items(vec![item(Some(1), 3, "10.00")]);
        cart.apply(CartAction::UpdateQuantity { variant_id: 1, quantity: -7 });
        assert_eq!(cart.item_count(), 1);
        assert!(cart.items()[0].quantity.is_zero());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_update_and_remove_unknown_variant_is_noop() {
        let mut cart = Cart::from_items(vec![item(Some(1), 3, "10.00")]);
        let before = cart.clone();
        cart.apply(CartAction::UpdateQuantity { variant_id: 99, quantity: 4 });
        cart.apply(CartAction::Remove { variant_id: 99 });
        assert_eq!(cart, before);
        cart.apply(CartAction::Remove { variant_id: 1 });
        assert!(cart.is_empty());
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_sum_quantities(qtys in prop::collection::vec(0u32..1000, 1..20)) {
            let mut cart = Cart::new();
            for q in &qtys { cart.apply(CartAction::Add(item(Some(7), *q, "1.00"))); }
            prop_assert_eq!(cart.item_count(), 1);
            prop_assert_eq!(cart.items()[0].quantity.value(), qtys.iter().sum::<u32>());
        }

        #[test]
        fn prop_negative_update_clamps_to_zero(q in i64::MIN..0) {
            let mut cart = Cart::from_items(vec![item(Some(1), 2, "3.00")]);
            cart.apply(CartAction::UpdateQuantity { variant_id: 1, quantity: q });
            prop_assert_eq!(cart.items()[0].quantity.value(), 0);
        }

        #[test]
        fn prop_clear_always_empties(ids in prop::collection::vec(0i64..50, 0..30)) {
            let mut cart = Cart::new();
            for id in ids { cart.apply(CartAction::Add(item(Some(id), 1, "2.00"))); }
            cart.apply(CartAction::Clear);
            prop_assert!(cart.is_empty());
        }
    }
}
