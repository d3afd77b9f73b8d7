//! Catalog filter state over a key/value store.
//!
//! Unlike the cart, filter notifications carry the complete new state so
//! listeners can react without reading the store again.

use thiserror::Error;
use tracing::instrument;

use gamershop_core::FilterState;

use crate::catalog::GenreSource;
use crate::events::{EventBus, StoreEvent};
use crate::storage::{Store, StoreError};

/// Storage key holding the serialized filter state.
pub const FILTER_STORAGE_KEY: &str = "gamershop_filters";

/// Genres offered when the catalog cannot be reached, so the filter bar keeps
/// working.
pub const FALLBACK_GENRES: [&str; 8] = [
    "Action",
    "Adventure",
    "Racing",
    "RPG",
    "Shooter",
    "Simulation",
    "Sports",
    "Strategy",
];

/// Errors returned by filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The backing store failed.
    #[error("Filter storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored filter state could not be parsed.
    #[error("Stored filters are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Filter state could not be serialized.
    #[error("Failed to serialize filters: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Filter state persistence bound to one store and one event bus.
#[derive(Debug, Clone)]
pub struct FilterService<S> {
    store: S,
    events: EventBus,
}

impl<S: Store> FilterService<S> {
    /// Create a service persisting to `store` and notifying on `events`.
    pub const fn new(store: S, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Load the filter state, distinguishing absence from corruption.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Corrupt` if the stored value is not valid, or
    /// `FilterError::Store` if it cannot be read.
    pub fn load(&self) -> Result<FilterState, FilterError> {
        match self.store.read(FILTER_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(FilterError::Corrupt),
            None => Ok(FilterState::default()),
        }
    }

    /// Current filter state; the default on missing or corrupt data.
    #[must_use]
    pub fn state(&self) -> FilterState {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unable to load filters, using defaults");
            FilterState::default()
        })
    }

    /// Set (or with `None`, clear) the genre filter.
    ///
    /// Returns the new state, which is also published to listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    #[instrument(skip(self))]
    pub fn set_genre(&self, genre: Option<String>) -> Result<FilterState, FilterError> {
        let mut state = self.state();
        state.genre = genre;
        self.save(state)
    }

    /// Reset every filter to its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    #[instrument(skip(self))]
    pub fn clear_all(&self) -> Result<FilterState, FilterError> {
        self.save(FilterState::default())
    }

    fn save(&self, state: FilterState) -> Result<FilterState, FilterError> {
        let raw = serde_json::to_string(&state).map_err(FilterError::Serialize)?;
        self.store.write(FILTER_STORAGE_KEY, &raw)?;
        self.events.publish(&StoreEvent::FiltersUpdated(state.clone()));
        Ok(state)
    }
}

/// Genres the catalog can be filtered by.
///
/// Falls back to [`FALLBACK_GENRES`] when the catalog request fails. A
/// successful response without any filters yields an empty list.
pub async fn available_genres<G: GenreSource>(source: &G) -> Vec<String> {
    match source.available_filters().await {
        Ok(genres) => genres,
        Err(e) => {
            tracing::warn!(error = %e, "Unable to fetch genres, using fallback list");
            FALLBACK_GENRES.iter().map(ToString::to_string).collect()
        }
    }
}
