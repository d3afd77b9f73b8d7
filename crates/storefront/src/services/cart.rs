//! Cart operations over a key/value store.
//!
//! Every mutation reads the whole cart, changes it in memory and writes the
//! whole cart back. Successful mutations publish [`StoreEvent::CartUpdated`].

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use gamershop_core::{Cart, CartItem, Game, GameId};

use crate::events::{EventBus, StoreEvent};
use crate::storage::{Store, StoreError};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "gamershop_cart";

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The backing store failed.
    #[error("Cart storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored cart data could not be parsed.
    #[error("Stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Cart could not be serialized.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Quantity outside the accepted range.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
}

/// Cart CRUD bound to one store and one event bus.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
    events: EventBus,
}

impl<S: Store> CartService<S> {
    /// Create a service persisting to `store` and notifying on `events`.
    pub const fn new(store: S, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Load the cart, distinguishing absence from corruption.
    ///
    /// A missing key is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Corrupt` if the stored value is not a valid cart,
    /// or `CartError::Store` if it cannot be read.
    pub fn load(&self) -> Result<Cart, CartError> {
        match self.store.read(CART_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(CartError::Corrupt),
            None => Ok(Cart::new()),
        }
    }

    /// Load the cart, treating any failure as an empty cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unable to load cart, using empty cart");
            Cart::new()
        })
    }

    /// Cart items in add order; empty on missing or corrupt data.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.cart().into_items()
    }

    /// Add `quantity` of `game`, merging with an existing item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity, or an error
    /// if the cart cannot be written.
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    pub fn add(&self, game: &Game, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let mut cart = self.cart();
        cart.add(game, quantity, Utc::now());
        self.save(&cart)
    }

    /// Remove a game. Succeeds whether or not it was in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    #[instrument(skip(self))]
    pub fn remove(&self, game_id: &GameId) -> Result<(), CartError> {
        let mut cart = self.cart();
        cart.remove(game_id);
        self.save(&cart)
    }

    /// Set a game's quantity.
    ///
    /// A quantity of zero or less removes the game and returns `true`.
    /// Otherwise returns `false`, without writing, if the game is not in the
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` above `u32::MAX`, or an error if
    /// the cart cannot be written.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, game_id: &GameId, quantity: i64) -> Result<bool, CartError> {
        if quantity <= 0 {
            self.remove(game_id)?;
            return Ok(true);
        }

        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;

        let mut cart = self.cart();
        if !cart.set_quantity(game_id, quantity) {
            return Ok(false);
        }
        self.save(&cart)?;
        Ok(true)
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), CartError> {
        self.store.remove(CART_STORAGE_KEY)?;
        self.events.publish(&StoreEvent::CartUpdated);
        Ok(())
    }

    /// Sum of `price × quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart().total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart().count()
    }

    /// Whether a game is in the cart.
    #[must_use]
    pub fn contains(&self, game_id: &GameId) -> bool {
        self.cart().contains(game_id)
    }

    fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(CartError::Serialize)?;
        self.store.write(CART_STORAGE_KEY, &raw)?;
        self.events.publish(&StoreEvent::CartUpdated);
        Ok(())
    }
}
