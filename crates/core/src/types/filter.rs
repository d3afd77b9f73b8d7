//! Catalog filter selection.

use serde::{Deserialize, Serialize};

/// The visitor's current catalog filters.
///
/// Only the genre is filterable today. New filter dimensions become new
/// optional fields with `#[serde(default)]` so previously stored state keeps
/// loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Genre to filter by; `None` shows every genre.
    #[serde(default)]
    pub genre: Option<String>,
}

impl FilterState {
    /// Whether no filter is active.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.genre.is_none()
    }
}
