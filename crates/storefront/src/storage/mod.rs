//! Persistent key/value storage for visitor state.
//!
//! # Architecture
//!
//! - [`Store`] is a small synchronous key/value contract: read, write, remove
//! - [`MemoryStore`] keeps everything in process (tests, `STOREFRONT_STORAGE=memory`)
//! - [`FileStore`] writes one JSON file per key under a data directory
//! - [`ScopedStore`] namespaces keys per visitor and enforces the value quota
//!
//! Values are opaque serialized blobs. There is no versioning and no locking
//! across a read-modify-write; concurrent writers of the same key race and the
//! last write wins.

mod file;
mod memory;
mod scoped;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use scoped::{DEFAULT_QUOTA_BYTES, ScopedStore};

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Value is larger than the configured quota.
    #[error("Quota exceeded for {key}: {size} bytes (limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
}

/// Synchronous key/value storage.
///
/// Implementations must be safe to share across request handlers.
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
