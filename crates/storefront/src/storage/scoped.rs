//! Per-visitor key namespace with a value quota.

use std::fmt;
use std::sync::Arc;

use super::{Store, StoreError};

/// Default quota for a single stored value (5 MiB, in line with browser storage).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A view of a shared backend restricted to one scope.
///
/// Keys are rewritten to `"{scope}:{key}"` before they reach the backend, so
/// two visitors never see each other's cart or filters.
#[derive(Clone)]
pub struct ScopedStore {
    backend: Arc<dyn Store>,
    scope: String,
    quota_bytes: usize,
}

impl ScopedStore {
    /// Create a scoped view over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn Store>, scope: impl Into<String>, quota_bytes: usize) -> Self {
        Self {
            backend,
            scope: scope.into(),
            quota_bytes,
        }
    }

    /// The scope prefix.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}:{key}", self.scope)
    }
}

impl fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("scope", &self.scope)
            .field("quota_bytes", &self.quota_bytes)
            .finish_non_exhaustive()
    }
}

impl Store for ScopedStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.read(&self.scoped_key(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if value.len() > self.quota_bytes {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit: self.quota_bytes,
            });
        }
        self.backend.write(&self.scoped_key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(&self.scoped_key(key))
    }
}
