//! Core types for GamerShop.

pub mod cart;
pub mod filter;
pub mod game;
pub mod id;
pub mod price;

pub use cart::{Cart, CartItem};
pub use filter::FilterState;
pub use game::{Game, GamesPage};
pub use id::*;
pub use price::{DEFAULT_TAX_RATE, OrderSummary, format_price};
