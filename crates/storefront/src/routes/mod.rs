//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero, first catalog page)
//! GET  /health                 - Health check
//!
//! # Catalog (HTMX fragments)
//! GET  /catalog?page=n         - Next catalog page for "Load More"
//!
//! # Filters (HTMX fragments, trigger filtersUpdated)
//! POST /filters/genre          - Set genre, returns catalog section
//! POST /filters/clear          - Clear filters, returns catalog section
//!
//! # Cart (HTMX fragments, mutations trigger cartUpdated)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns add-to-cart button)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # JSON API
//! GET  /api/cart               - Cart items, count and total
//! GET  /api/filters            - Filter state
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod filters;
pub mod home;
pub mod htmx;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::mutation_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes(rate_limit: bool) -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear));

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(limit(mutations, rate_limit))
}

/// Create the filter routes router.
pub fn filter_routes(rate_limit: bool) -> Router<AppState> {
    let mutations = Router::new()
        .route("/genre", post(filters::set_genre))
        .route("/clear", post(filters::clear));

    limit(mutations, rate_limit)
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(api::cart))
        .route("/filters", get(api::filters))
}

fn limit(router: Router<AppState>, enabled: bool) -> Router<AppState> {
    if enabled {
        router.layer(mutation_rate_limiter())
    } else {
        router
    }
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog pages
        .route("/catalog", get(catalog::page))
        // Filter routes
        .nest("/filters", filter_routes(rate_limit))
        // Cart routes
        .nest("/cart", cart_routes(rate_limit))
        // JSON API
        .nest("/api", api_routes())
}
