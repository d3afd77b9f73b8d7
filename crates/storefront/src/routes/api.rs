//! JSON API handlers.
//!
//! Read-only views of the visitor's stored state. Unlike the HTML pages these
//! report unreadable state as an error instead of rendering an empty cart.

use axum::Json;
use gamershop_core::{CartItem, FilterState};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Visitor;
use crate::routes::cart::subtotal;

/// Cart contents as served by `GET /api/cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub count: u64,
    pub total: Decimal,
}

/// Get the visitor's cart.
#[instrument(skip(visitor))]
pub async fn cart(visitor: Visitor) -> Result<Json<CartResponse>> {
    let cart = visitor.cart().load()?;

    Ok(Json(CartResponse {
        count: cart.count(),
        total: subtotal(&cart),
        items: cart.into_items(),
    }))
}

/// Get the visitor's filter state.
#[instrument(skip(visitor))]
pub async fn filters(visitor: Visitor) -> Result<Json<FilterState>> {
    Ok(Json(visitor.filters().load()?))
}
