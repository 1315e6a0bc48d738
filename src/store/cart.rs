//! The cart as a plain value.
//!
//! Every operation returns a new [`Cart`]; nothing here talks to an actor or the backend.
//! Both the live store cart and the order editor are built on these functions.

use crate::model::{MenuItem, MenuItemId, Order, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One line of the cart. At most one entry per item id; quantity is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// A cart entry resolved against the menu, ready to render.
///
/// An entry whose item is no longer on the menu resolves to a blank name and a zero price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Ordered list of [`CartEntry`], in the order items were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from `(item, quantity)` pairs, merging repeated items and dropping
    /// zero quantities.
    pub fn from_quantities(quantities: impl IntoIterator<Item = (MenuItemId, u32)>) -> Self {
        let mut cart = Cart::new();
        for (item_id, quantity) in quantities {
            if quantity == 0 {
                continue;
            }
            match cart.entries.iter_mut().find(|e| e.item_id == item_id) {
                Some(entry) => entry.quantity += quantity,
                None => cart.entries.push(CartEntry { item_id, quantity }),
            }
        }
        cart
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, item_id: MenuItemId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item_id == item_id)
            .map_or(0, |e| e.quantity)
    }

    /// Appends `{item_id, 1}`, or bumps the existing entry for `item_id`.
    pub fn with_entry_added(&self, item_id: MenuItemId) -> Cart {
        if self.entries.iter().any(|e| e.item_id == item_id) {
            self.with_quantity_incremented(item_id)
        } else {
            let mut entries = self.entries.clone();
            entries.push(CartEntry {
                item_id,
                quantity: 1,
            });
            Cart { entries }
        }
    }

    /// No-op when `item_id` is not in the cart.
    pub fn with_quantity_incremented(&self, item_id: MenuItemId) -> Cart {
        self.with_adjusted(item_id, |quantity| quantity.saturating_add(1))
    }

    /// Dropping below 1 removes the entry. No-op when `item_id` is not in the cart.
    pub fn with_quantity_decremented(&self, item_id: MenuItemId) -> Cart {
        self.with_adjusted(item_id, |quantity| quantity.saturating_sub(1))
    }

    fn with_adjusted(&self, item_id: MenuItemId, adjust: impl Fn(u32) -> u32) -> Cart {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.item_id == item_id {
                    CartEntry {
                        item_id,
                        quantity: adjust(entry.quantity),
                    }
                } else {
                    *entry
                }
            })
            .filter(|entry| entry.quantity > 0)
            .collect();
        Cart { entries }
    }

    /// Sum of price × quantity. Entries missing from `menu` contribute nothing.
    pub fn total_price(&self, menu: &[MenuItem]) -> f64 {
        self.entries
            .iter()
            .filter_map(|entry| {
                find_item(menu, entry.item_id).map(|item| item.price * f64::from(entry.quantity))
            })
            .sum()
    }

    pub fn items_map(&self) -> BTreeMap<MenuItemId, u32> {
        self.entries
            .iter()
            .map(|entry| (entry.item_id, entry.quantity))
            .collect()
    }

    pub fn lines(&self, menu: &[MenuItem]) -> Vec<CartLine> {
        self.entries
            .iter()
            .map(|entry| {
                let (name, unit_price) = match find_item(menu, entry.item_id) {
                    Some(item) => (item.name.clone(), item.price),
                    None => (String::new(), 0.0),
                };
                CartLine {
                    item_id: entry.item_id,
                    name,
                    unit_price,
                    quantity: entry.quantity,
                    line_total: unit_price * f64::from(entry.quantity),
                }
            })
            .collect()
    }

    /// The order this cart would submit as a new order, priced against `menu`.
    pub fn draft_order(&self, menu: &[MenuItem], time: DateTime<Utc>, user_id: UserId) -> Order {
        Order {
            id: None,
            price: self.total_price(menu),
            time,
            user_id,
            status: None,
            items: self.items_map(),
        }
    }
}

fn find_item(menu: &[MenuItem], item_id: MenuItemId) -> Option<&MenuItem> {
    menu.iter().find(|item| item.id == Some(item_id))
}
