//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::{StorageBackend, StorefrontConfig};
use crate::storage::{FileStore, MemoryStore, ScopedStore, Store, StoreError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("storage backend: {0}")]
    Storage(#[from] StoreError),
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the storage backend and the catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    storage: Arc<dyn Store>,
}

impl AppState {
    /// Create a new application state with the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// catalog client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage: Arc<dyn Store> = match &config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File(dir) => Arc::new(FileStore::open(dir)?),
        };
        Self::with_storage(config, storage)
    }

    /// Create a new application state over an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn Store>,
    ) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Storage view restricted to one scope, with the configured quota.
    #[must_use]
    pub fn scoped_storage(&self, scope: impl Into<String>) -> ScopedStore {
        ScopedStore::new(
            Arc::clone(&self.inner.storage),
            scope,
            self.inner.config.storage.quota_bytes,
        )
    }
}
