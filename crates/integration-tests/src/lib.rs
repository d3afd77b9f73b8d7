//! Integration test harness for the GamerShop storefront.
//!
//! Each test spawns its own mock catalog API and a real storefront on
//! ephemeral ports, then drives the storefront over HTTP with a
//! cookie-keeping client, so every test is a separate visitor.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gamershop-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use gamershop_core::DEFAULT_TAX_RATE;
use gamershop_storefront::config::{
    CatalogConfig, SentryConfig, StorageBackend, StorageConfig, StorefrontConfig,
};
use gamershop_storefront::state::AppState;
use gamershop_storefront::storage::DEFAULT_QUOTA_BYTES;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Games per page served by the mock catalog.
pub const PAGE_SIZE: usize = 6;

/// Catalog records as the catalog API sends them (numeric prices).
#[must_use]
pub fn sample_games() -> Vec<Value> {
    [
        ("1", "Action", "Iron Circuit", 59.99, true),
        ("2", "RPG", "Embers of Aldren", 39.99, false),
        ("3", "Action", "Night Courier", 29.99, false),
        ("4", "Racing", "Drift King", 49.99, true),
        ("5", "Sports", "Final Whistle", 19.99, false),
        ("6", "RPG", "The Lantern Road", 44.99, false),
        ("7", "Strategy", "Border Lords", 34.99, false),
        ("8", "Action", "Skyline Breach", 24.99, false),
    ]
    .into_iter()
    .map(|(id, genre, name, price, is_new)| {
        json!({
            "id": id,
            "genre": genre,
            "image": format!("https://images.example/{id}.jpg"),
            "name": name,
            "description": format!("{name}, a {genre} game."),
            "price": price,
            "isNew": is_new,
        })
    })
    .collect()
}

#[derive(Debug, Deserialize)]
struct GamesQuery {
    page: Option<usize>,
    genre: Option<String>,
}

async fn games_handler(
    State(games): State<Arc<Vec<Value>>>,
    Query(query): Query<GamesQuery>,
) -> Json<Value> {
    let filtered: Vec<&Value> = games
        .iter()
        .filter(|game| {
            query
                .genre
                .as_deref()
                .is_none_or(|genre| game["genre"] == genre)
        })
        .collect();

    let mut genres: Vec<&str> = games
        .iter()
        .filter_map(|game| game["genre"].as_str())
        .collect();
    genres.sort_unstable();
    genres.dedup();

    let page = query.page.unwrap_or(1).max(1);
    let total_pages = filtered.len().div_ceil(PAGE_SIZE).max(1);
    let items: Vec<&Value> = filtered
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Json(json!({
        "games": items,
        "availableFilters": genres,
        "totalPages": total_pages,
        "currentPage": page,
    }))
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server error");
    });

    addr
}

/// Spawn a catalog API serving `games`, paginated and filterable by genre.
pub async fn spawn_catalog(games: Vec<Value>) -> String {
    let router = Router::new()
        .route("/api/games", get(games_handler))
        .with_state(Arc::new(games));
    format!("http://{}", serve(router).await)
}

/// Spawn a catalog API that answers every request with HTTP 500.
pub async fn spawn_failing_catalog() -> String {
    let router = Router::new().route(
        "/api/games",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    format!("http://{}", serve(router).await)
}

/// Spawn a catalog API that answers with a body that is not a games page.
pub async fn spawn_malformed_catalog() -> String {
    let router = Router::new().route(
        "/api/games",
        get(|| async { Json(json!({ "games": "not a list" })) }),
    );
    format!("http://{}", serve(router).await)
}

/// Storefront configuration for tests: memory storage, no rate limiting.
#[must_use]
pub fn test_config(catalog_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        catalog: CatalogConfig {
            base_url: Url::parse(catalog_url).expect("Invalid catalog URL"),
            api_token: None,
            cache_ttl_secs: 60,
            timeout_secs: 5,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        },
        tax_rate: DEFAULT_TAX_RATE,
        rate_limit: false,
        sentry: SentryConfig::default(),
    }
}

/// A running storefront and the address it listens on.
pub struct TestStorefront {
    pub base_url: String,
}

impl TestStorefront {
    /// Spawn a storefront in front of the catalog at `catalog_url`.
    pub async fn spawn(catalog_url: &str) -> Self {
        Self::spawn_with(test_config(catalog_url)).await
    }

    /// Spawn a storefront with an explicit configuration.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build storefront state");
        let addr = serve(gamershop_storefront::app(state)).await;
        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A new visitor: a client with its own cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }
}

/// Parse the `HX-Trigger` header of a response, if present.
#[must_use]
pub fn hx_trigger(response: &reqwest::Response) -> Option<Value> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| serde_json::from_str(value).ok())
}
