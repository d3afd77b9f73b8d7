//! Genre filter route handlers.
//!
//! Both handlers answer with the refreshed catalog section and an
//! `HX-Trigger: filtersUpdated` header carrying the new state.

use axum::{Form, extract::State};
use gamershop_core::FilterState;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::routes::catalog::{CatalogTemplate, CatalogView};
use crate::routes::htmx::HxTriggers;
use crate::services::available_genres;
use crate::state::AppState;

/// Select value meaning "no genre filter".
pub const ALL_GENRES: &str = "all";

/// Genre selector display data for templates.
#[derive(Debug, Clone)]
pub struct GenreFilterView {
    pub genres: Vec<String>,
    pub selected: Option<String>,
    /// Render with `hx-swap-oob` so it replaces the selector already on the page.
    pub oob: bool,
}

impl GenreFilterView {
    #[must_use]
    pub fn is_selected(&self, genre: &str) -> bool {
        self.selected.as_deref() == Some(genre)
    }
}

/// Genre form data.
#[derive(Debug, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    pub genre: String,
}

/// Map the selector value to a genre; "all" and blank clear the filter.
#[must_use]
pub fn parse_genre(raw: &str) -> Option<String> {
    match raw.trim() {
        "" | ALL_GENRES => None,
        genre => Some(genre.to_string()),
    }
}

async fn catalog_section(
    state: &AppState,
    visitor: &Visitor,
    filters: &FilterState,
    genre_filter: Option<GenreFilterView>,
) -> CatalogTemplate {
    let cart = visitor.cart().cart();
    let catalog = CatalogView::load(state.catalog(), &cart, 1, filters.genre.as_deref()).await;
    CatalogTemplate {
        catalog,
        genre_filter,
    }
}

/// Change the genre filter (HTMX).
#[instrument(skip(state, visitor))]
pub async fn set_genre(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<GenreForm>,
) -> Result<(HxTriggers, CatalogTemplate)> {
    let triggers = HxTriggers::record(&visitor.events);
    let filters = visitor.filters().set_genre(parse_genre(&form.genre))?;

    add_breadcrumb(
        "filters",
        "Genre changed",
        Some(&[("genre", filters.genre.as_deref().unwrap_or(ALL_GENRES))]),
    );

    let section = catalog_section(&state, &visitor, &filters, None).await;
    Ok((triggers, section))
}

/// Reset every filter (HTMX).
///
/// Also resets the genre selector out of band.
#[instrument(skip(state, visitor))]
pub async fn clear(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<(HxTriggers, CatalogTemplate)> {
    let triggers = HxTriggers::record(&visitor.events);
    let filters = visitor.filters().clear_all()?;

    let selector = GenreFilterView {
        genres: available_genres(state.catalog()).await,
        selected: None,
        oob: true,
    };

    let section = catalog_section(&state, &visitor, &filters, Some(selector)).await;
    Ok((triggers, section))
}
