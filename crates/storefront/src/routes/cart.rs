//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with a fresh fragment plus `HX-Trigger: cartUpdated`
//! so the navbar badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use gamershop_core::{Cart, CartItem, GameId, OrderSummary, format_price};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::catalog::{GameButtonTemplate, GameCardView};
use crate::routes::htmx::HxTriggers;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.game.id.to_string(),
            name: item.game.name.clone(),
            genre: item.game.genre.clone(),
            description: item.game.description.clone(),
            image: item.game.image.clone(),
            quantity: item.quantity,
            price: format_price(item.game.price),
            line_total: format_price(item.line_total()),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Build the view, computing the order summary at `tax_rate`.
    #[must_use]
    pub fn new(cart: &Cart, tax_rate: Decimal) -> Self {
        let summary = OrderSummary::new(subtotal(cart), tax_rate);
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.count(),
            subtotal: format_price(summary.subtotal),
            tax: format_price(summary.tax),
            total: format_price(summary.total),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart total, logged and saturated when catalog prices overflow it.
pub(crate) fn subtotal(cart: &Cart) -> Decimal {
    cart.checked_total().unwrap_or_else(|| {
        tracing::warn!(items = cart.len(), "Cart total overflowed, showing saturated value");
        Decimal::MAX
    })
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub game_id: String,
    /// Catalog page the game was listed on.
    pub page: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub game_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub game_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart_count: u64,
    pub cart: CartView,
}

/// Cart items and order summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

fn parse_game_id(raw: &str) -> Result<GameId> {
    GameId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn items_fragment(state: &AppState, visitor: &Visitor) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: CartView::new(&visitor.cart().cart(), state.config().tax_rate),
    }
}

/// Display cart page.
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, visitor: Visitor) -> CartShowTemplate {
    let cart = visitor.cart().cart();

    CartShowTemplate {
        cart_count: cart.count(),
        cart: CartView::new(&cart, state.config().tax_rate),
    }
}

/// Add a game to the cart (HTMX).
///
/// The game snapshot comes from the catalog, never from the form. Adding a
/// game that is already in the cart changes nothing.
#[instrument(skip(state, visitor), fields(game_id = %form.game_id))]
pub async fn add(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<(HxTriggers, GameButtonTemplate)> {
    let game_id = parse_game_id(&form.game_id)?;
    let page = form.page.unwrap_or(1).max(1);
    let triggers = HxTriggers::record(&visitor.events);
    let cart = visitor.cart();

    if let Some(item) = cart.cart().get(&game_id) {
        return Ok((
            triggers,
            GameButtonTemplate {
                game: GameCardView::new(&item.game, true, page),
            },
        ));
    }

    let filters = visitor.filters().state();
    let game = state
        .catalog()
        .find_game(&game_id, page, filters.genre.as_deref())
        .await?;

    cart.add(&game, 1)?;
    add_breadcrumb("cart", "Added game", Some(&[("game_id", game_id.as_str())]));

    Ok((
        triggers,
        GameButtonTemplate {
            game: GameCardView::new(&game, true, page),
        },
    ))
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero or less removes the item.
#[instrument(skip(state, visitor))]
pub async fn update(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<UpdateCartForm>,
) -> Result<(HxTriggers, CartItemsTemplate)> {
    let game_id = parse_game_id(&form.game_id)?;
    let triggers = HxTriggers::record(&visitor.events);

    if !visitor.cart().update_quantity(&game_id, form.quantity)? {
        tracing::debug!(game_id = %game_id, "Quantity update for game not in cart");
    }

    Ok((triggers, items_fragment(&state, &visitor)))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, visitor))]
pub async fn remove(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<(HxTriggers, CartItemsTemplate)> {
    let game_id = parse_game_id(&form.game_id)?;
    let triggers = HxTriggers::record(&visitor.events);

    visitor.cart().remove(&game_id)?;
    add_breadcrumb("cart", "Removed game", Some(&[("game_id", game_id.as_str())]));

    Ok((triggers, items_fragment(&state, &visitor)))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, visitor))]
pub async fn clear(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<(HxTriggers, CartItemsTemplate)> {
    let triggers = HxTriggers::record(&visitor.events);

    visitor.cart().clear()?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok((triggers, items_fragment(&state, &visitor)))
}

/// Get cart count badge (HTMX).
#[instrument(skip(visitor))]
pub async fn count(visitor: Visitor) -> CartCountTemplate {
    CartCountTemplate {
        cart_count: visitor.cart().count(),
    }
}
