//! Client for the external catalog API.
//!
//! # Endpoint
//!
//! ```text
//! GET {CATALOG_API_URL}/api/games?page=<n>&genre=<optional>
//! -> { "games": Game[], "availableFilters": string[], "totalPages": n, "currentPage": n }
//! ```
//!
//! The catalog is the source of truth for games and prices. Successful page
//! responses are cached with `moka` for a short TTL, and every game seen on a
//! page is indexed so add-to-cart can resolve a snapshot without trusting
//! form data. Failed requests are never cached and never retried.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use gamershop_core::{Game, GameId, GamesPage};

use crate::config::CatalogConfig;
use cache::PageKey;

/// Path of the games listing relative to the catalog base URL.
const GAMES_PATH: &str = "/api/games";

/// Maximum number of cached pages and games.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned status {0}")]
    Status(StatusCode),

    /// Response body did not match the expected shape.
    #[error("Invalid catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Requested game is not in the catalog.
    #[error("Game not found: {0}")]
    NotFound(GameId),

    /// Base URL could not be combined with the endpoint path.
    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CatalogError {
    /// Message shown to visitors when the catalog cannot be displayed.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Invalid data format received",
            _ => "Failed to load games",
        }
    }
}

/// The part of a listing response the genre selector needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FiltersResponse {
    #[serde(default)]
    available_filters: Vec<String>,
}

/// Something that can list the genres the catalog can be filtered by.
pub trait GenreSource: Send + Sync {
    /// Fetch the catalog's available genre filters.
    fn available_filters(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;
}

/// Client for the catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and caches.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    games_url: Url,
    api_token: Option<SecretString>,
    pages: Cache<PageKey, GamesPage>,
    games: Cache<GameId, Game>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be joined with the endpoint
    /// path or the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let games_url = config.base_url.join(GAMES_PATH)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let pages = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        let games = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                games_url,
                api_token: config.api_token.clone(),
                pages,
                games,
            }),
        })
    }

    /// Fetch one page of games, optionally filtered by genre.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a valid games page.
    #[instrument(skip(self))]
    pub async fn fetch_games(
        &self,
        page: u32,
        genre: Option<&str>,
    ) -> Result<GamesPage, CatalogError> {
        let key = PageKey::new(page, genre);

        if let Some(cached) = self.inner.pages.get(&key).await {
            debug!("Cache hit for games page");
            return Ok(cached);
        }

        let mut url = self.inner.games_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(genre) = key.genre.as_deref() {
                query.append_pair("genre", genre);
            }
        }

        let games_page: GamesPage = self.get_json(url).await?;

        for game in &games_page.games {
            self.inner.games.insert(game.id.clone(), game.clone()).await;
        }
        self.inner.pages.insert(key, games_page.clone()).await;

        Ok(games_page)
    }

    /// Fetch one page and return only its games.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_games`].
    pub async fn fetch_games_page(
        &self,
        page: u32,
        genre: Option<&str>,
    ) -> Result<Vec<Game>, CatalogError> {
        Ok(self.fetch_games(page, genre).await?.games)
    }

    /// Resolve the catalog record for `id`.
    ///
    /// Uses recently fetched games first, then looks on the page the visitor
    /// was browsing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the game is not on that page, or
    /// any error from fetching the page.
    #[instrument(skip(self), fields(game_id = %id))]
    pub async fn find_game(
        &self,
        id: &GameId,
        page: u32,
        genre: Option<&str>,
    ) -> Result<Game, CatalogError> {
        if let Some(game) = self.inner.games.get(id).await {
            return Ok(game);
        }

        let games_page = self.fetch_games(page, genre).await?;
        games_page
            .find(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Catalog returned non-success status");
            return Err(CatalogError::Status(status));
        }

        // Read as text first so a malformed body can be logged.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl GenreSource for CatalogClient {
    #[instrument(skip(self))]
    async fn available_filters(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.inner.games_url.clone();
        let response: FiltersResponse = self.get_json(url).await?;
        Ok(response.available_filters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::get,
    };
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone, Default)]
    struct Mock {
        hits: Arc<AtomicUsize>,
        last_auth: Arc<std::sync::Mutex<Option<String>>>,
    }

    async fn games(
        State(mock): State<Mock>,
        headers: HeaderMap,
        Query(query): Query<std::collections::HashMap<String, String>>,
    ) -> Result<Json<Value>, AxumStatus> {
        mock.hits.fetch_add(1, Ordering::SeqCst);
        *mock.last_auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if query.get("genre").map(String::as_str) == Some("Broken") {
            return Err(AxumStatus::INTERNAL_SERVER_ERROR);
        }

        let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        Ok(Json(json!({
            "games": [{
                "id": format!("p{page}"),
                "genre": "Action",
                "image": "/img.jpg",
                "name": format!("Game on page {page}"),
                "description": "",
                "price": 19.99
            }],
            "availableFilters": ["Action", "RPG"],
            "totalPages": 3,
            "currentPage": page
        })))
    }

    async fn spawn(mock: Mock, api_token: Option<&str>) -> CatalogClient {
        let router = Router::new()
            .route("/api/games", get(games))
            .with_state(mock);
        serve(router, api_token).await
    }

    /// Catalog that answers every request with `body`.
    async fn spawn_fixed(body: Value) -> CatalogClient {
        let router = Router::new().route(
            "/api/games",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        serve(router, None).await
    }

    async fn serve(router: Router, api_token: Option<&str>) -> CatalogClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            api_token: api_token.map(|t| SecretString::from(t.to_string())),
            cache_ttl_secs: 60,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_games_caches_pages() {
        let mock = Mock::default();
        let client = spawn(mock.clone(), None).await;

        let page = client.fetch_games(2, None).await.unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.games[0].price, rust_decimal::Decimal::new(1999, 2));
        assert!(page.has_more_pages());

        client.fetch_games(2, None).await.unwrap();
        assert_eq!(mock.hits.load(Ordering::SeqCst), 1);

        let games = client.fetch_games_page(3, Some("RPG")).await.unwrap();
        assert_eq!(games[0].name, "Game on page 3");
        assert_eq!(mock.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mock = Mock::default();
        let client = spawn(mock.clone(), None).await;

        let err = client.fetch_games(1, Some("Broken")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
        client.fetch_games(1, Some("Broken")).await.unwrap_err();
        assert_eq!(mock.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_find_game_uses_index_then_page() {
        let mock = Mock::default();
        let client = spawn(mock.clone(), None).await;

        let game = client.find_game(&GameId::new("p1"), 1, None).await.unwrap();
        assert_eq!(game.name, "Game on page 1");

        // Already indexed, so the page is not needed
        let game = client.find_game(&GameId::new("p1"), 3, None).await.unwrap();
        assert_eq!(game.id.as_str(), "p1");
        assert_eq!(mock.hits.load(Ordering::SeqCst), 1);

        let err = client.find_game(&GameId::new("zzz"), 1, None).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bearer_token_and_genres() {
        let mock = Mock::default();
        let client = spawn(mock.clone(), Some("k3y-for-tests")).await;

        let genres = client.available_filters().await.unwrap();
        assert_eq!(genres, vec!["Action".to_string(), "RPG".to_string()]);
        assert_eq!(
            mock.last_auth.lock().unwrap().as_deref(),
            Some("Bearer k3y-for-tests")
        );
    }

    #[tokio::test]
    async fn test_genres_without_listing_fields() {
        let client = spawn_fixed(json!({})).await;
        assert!(client.available_filters().await.unwrap().is_empty());

        let client = spawn_fixed(json!({"availableFilters": ["Puzzle"]})).await;
        assert_eq!(client.available_filters().await.unwrap(), vec!["Puzzle"]);
    }

    #[tokio::test]
    async fn test_negative_price_is_a_parse_error() {
        let client = spawn_fixed(json!({
            "games": [{
                "id": "1",
                "genre": "Action",
                "image": "/img.jpg",
                "name": "Refund Simulator",
                "description": "",
                "price": -59.99
            }],
            "totalPages": 1,
            "currentPage": 1
        }))
        .await;

        let err = client.fetch_games(1, None).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert_eq!(err.user_message(), "Invalid data format received");
    }

    #[test]
    fn test_user_messages() {
        let parse = serde_json::from_str::<GamesPage>("{}").unwrap_err();
        assert_eq!(
            CatalogError::Parse(parse).user_message(),
            "Invalid data format received"
        );
        assert_eq!(
            CatalogError::Status(StatusCode::INTERNAL_SERVER_ERROR).user_message(),
            "Failed to load games"
        );
        assert_eq!(
            CatalogError::NotFound(GameId::new("1")).user_message(),
            "Failed to load games"
        );
    }

    #[test]
    fn test_games_url_is_joined_onto_base() {
        let config = CatalogConfig {
            base_url: Url::parse("http://catalog.local:4000/").unwrap(),
            api_token: None,
            cache_ttl_secs: 60,
            timeout_secs: 5,
        };
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(
            client.inner.games_url.as_str(),
            "http://catalog.local:4000/api/games"
        );
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Catalog returned status 502 Bad Gateway");
        let err = CatalogError::NotFound(GameId::new("g-7"));
        assert_eq!(err.to_string(), "Game not found: g-7");
    }
}
