//! GamerShop Core - Shared domain types.
//!
//! This crate provides the types used by the storefront and its tests:
//! - [`Game`] and [`GamesPage`] - catalog records as served by the catalog API
//! - [`Cart`] and [`CartItem`] - the visitor's shopping cart
//! - [`FilterState`] - the visitor's catalog filter selection
//! - [`OrderSummary`] and [`format_price`] - money display helpers
//!
//! # Architecture
//!
//! The core crate contains only types and their in-memory semantics - no I/O,
//! no storage, no HTTP clients. Persistence and change notification live in
//! the storefront crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
