//! Session-related types.
//!
//! The session only identifies the visitor. Cart and filter state live in the
//! visitor's scope of the storage backend, not in the session itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one browser, stored in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(Uuid);

impl VisitorId {
    /// Generate a fresh random visitor ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Storage scope for this visitor (hyphen-free so it is a valid key component).
    #[must_use]
    pub fn scope(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's storage scope.
    pub const VISITOR_ID: &str = "visitor_id";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_is_simple_uuid() {
        let id = VisitorId::generate();
        let scope = id.scope();
        assert_eq!(scope.len(), 32);
        assert!(scope.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(VisitorId::generate(), VisitorId::generate());
    }
}
