//! Catalog route handlers.
//!
//! The first page is rendered into the home page; "Load More" fetches the
//! following pages as fragments appended to the grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use gamershop_core::{Cart, Game, format_price};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::CatalogClient;
use crate::middleware::Visitor;
use crate::routes::filters::GenreFilterView;
use crate::state::AppState;

/// Game card display data for templates.
#[derive(Debug, Clone)]
pub struct GameCardView {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub image: String,
    pub price: String,
    pub is_new: bool,
    pub in_cart: bool,
    /// Catalog page the card was rendered on, sent back with "Add to Cart".
    pub page: u32,
}

impl GameCardView {
    #[must_use]
    pub fn new(game: &Game, in_cart: bool, page: u32) -> Self {
        Self {
            id: game.id.to_string(),
            name: game.name.clone(),
            genre: game.genre.clone(),
            image: game.image.clone(),
            price: format_price(game.price),
            is_new: game.is_new,
            in_cart,
            page,
        }
    }
}

/// One rendered page of the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    pub games: Vec<GameCardView>,
    /// Message shown instead of the games when the catalog API failed.
    pub error: Option<String>,
    pub next_page: Option<u32>,
}

impl CatalogView {
    /// Fetch `page` for `genre` and mark the games already in `cart`.
    ///
    /// Never fails: a catalog error becomes the view's message.
    pub async fn load(
        catalog: &CatalogClient,
        cart: &Cart,
        page: u32,
        genre: Option<&str>,
    ) -> Self {
        match catalog.fetch_games(page, genre).await {
            Ok(games_page) => Self {
                games: games_page
                    .games
                    .iter()
                    .map(|game| GameCardView::new(game, cart.contains(&game.id), page))
                    .collect(),
                error: None,
                next_page: games_page
                    .has_more_pages()
                    .then(|| games_page.current_page.saturating_add(1)),
            },
            Err(e) => {
                tracing::warn!(page, genre, "Failed to load catalog: {e}");
                Self {
                    error: Some(e.user_message().to_string()),
                    ..Self::default()
                }
            }
        }
    }
}

/// Catalog section fragment (for HTMX filter changes).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_section.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
    /// Genre selector re-rendered out of band, when it needs resetting.
    pub genre_filter: Option<GenreFilterView>,
}

/// Further catalog cards fragment (for "Load More").
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_page.html")]
pub struct CatalogPageTemplate {
    pub catalog: CatalogView,
}

/// Add-to-cart button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/game_button.html")]
pub struct GameButtonTemplate {
    pub game: GameCardView,
}

/// Catalog page query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
}

/// Render one more page of the catalog for the saved genre (HTMX).
#[instrument(skip(state, visitor))]
pub async fn page(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(query): Query<CatalogQuery>,
) -> CatalogPageTemplate {
    let page = query.page.unwrap_or(1).max(1);
    let filters = visitor.filters().state();
    let cart = visitor.cart().cart();

    let catalog =
        CatalogView::load(state.catalog(), &cart, page, filters.genre.as_deref()).await;

    CatalogPageTemplate { catalog }
}
