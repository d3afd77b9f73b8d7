//! Visitor state services.
//!
//! # Services
//!
//! - [`cart`] - Cart CRUD over the `gamershop_cart` key
//! - [`filter`] - Filter state over the `gamershop_filters` key, plus the
//!   genre list used by the hero filter bar
//!
//! Both services are generic over the [`Store`](crate::storage::Store) they
//! persist to and publish on an injected
//! [`EventBus`](crate::events::EventBus) after every successful mutation.

pub mod cart;
pub mod filter;

pub use cart::{CART_STORAGE_KEY, CartError, CartService};
pub use filter::{
    FALLBACK_GENRES, FILTER_STORAGE_KEY, FilterError, FilterService, available_genres,
};
