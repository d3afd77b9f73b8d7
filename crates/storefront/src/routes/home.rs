//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::filters;
use crate::middleware::Visitor;
use crate::routes::catalog::CatalogView;
use crate::routes::filters::GenreFilterView;
use crate::services::available_genres;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub cart_count: u64,
    pub genre_filter: GenreFilterView,
    pub catalog: CatalogView,
}

/// Display home page: hero with genre selector and the first catalog page.
#[instrument(skip(state, visitor))]
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> HomeTemplate {
    let filters = visitor.filters().state();
    let cart = visitor.cart().cart();

    let (genres, catalog) = tokio::join!(
        available_genres(state.catalog()),
        CatalogView::load(state.catalog(), &cart, 1, filters.genre.as_deref()),
    );

    HomeTemplate {
        cart_count: cart.count(),
        genre_filter: GenreFilterView {
            genres,
            selected: filters.genre,
            oob: false,
        },
        catalog,
    }
}
