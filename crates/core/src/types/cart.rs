//! Shopping cart collection and its in-memory semantics.
//!
//! A [`Cart`] is persisted as a bare JSON array of [`CartItem`]s. Insertion
//! order is add order, and the collection holds at most one item per game ID.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::game::Game;
use super::id::GameId;

/// A game snapshot with the quantity the visitor wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Copy of the catalog record at the time it was added.
    pub game: Game,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
    /// When the game was first added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Price of this line (`price × quantity`), saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    /// Price of this line, or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.game.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered cart contents keyed by `game.id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in add order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of distinct games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of `game`.
    ///
    /// An existing item for the same game ID has its quantity increased
    /// (saturating at `u32::MAX`); otherwise a new item stamped with `now` is
    /// appended.
    pub fn add(&mut self, game: &Game, quantity: u32, now: DateTime<Utc>) {
        if let Some(item) = self.find_mut(&game.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem {
            game: game.clone(),
            quantity,
            added_at: now,
        });
    }

    /// Remove every item for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &GameId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.game.id != id);
        self.items.len() != before
    }

    /// Set the quantity of an existing item. Returns `false` if `id` is absent.
    pub fn set_quantity(&mut self, id: &GameId, quantity: u32) -> bool {
        match self.find_mut(id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Whether a game is in the cart.
    #[must_use]
    pub fn contains(&self, id: &GameId) -> bool {
        self.items.iter().any(|item| &item.game.id == id)
    }

    /// Look up the item for a game.
    #[must_use]
    pub fn get(&self, id: &GameId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.game.id == id)
    }

    /// Sum of `price × quantity` over all items, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.checked_total().unwrap_or(Decimal::MAX)
    }

    /// Exact total, or `None` if a line or the sum overflows.
    #[must_use]
    pub fn checked_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.checked_line_total()?))
    }

    /// Sum of quantities over all items.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn find_mut(&mut self, id: &GameId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.game.id == id)
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self { items }
    }
}
