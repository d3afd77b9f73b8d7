//! Visitor extractor.
//!
//! Every browser gets a random visitor ID in its session. Cart and filter
//! state for that browser live under the visitor's scope of the storage
//! backend.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::events::EventBus;
use crate::models::{VisitorId, session_keys};
use crate::services::{CartService, FilterService};
use crate::state::AppState;
use crate::storage::ScopedStore;

/// The current visitor's storage scope and event bus.
///
/// The bus is fresh for every request, so listeners only ever see events
/// published while handling that request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(visitor: Visitor) -> impl IntoResponse {
///     format!("{} items", visitor.cart().count())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: VisitorId,
    pub store: ScopedStore,
    pub events: EventBus,
}

impl Visitor {
    /// Cart service bound to this visitor.
    #[must_use]
    pub fn cart(&self) -> CartService<&ScopedStore> {
        CartService::new(&self.store, self.events.clone())
    }

    /// Filter service bound to this visitor.
    #[must_use]
    pub fn filters(&self) -> FilterService<&ScopedStore> {
        FilterService::new(&self.store, self.events.clone())
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = match session.get::<VisitorId>(session_keys::VISITOR_ID).await? {
            Some(id) => id,
            None => {
                let id = VisitorId::generate();
                session.insert(session_keys::VISITOR_ID, id).await?;
                tracing::debug!(visitor_id = %id, "New visitor");
                id
            }
        };

        Ok(Self {
            id,
            store: state.scoped_storage(id.scope()),
            events: EventBus::new(),
        })
    }
}
