//! Cache key types for catalog responses.

/// Cache key for one page of the games listing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PageKey {
    pub page: u32,
    pub genre: Option<String>,
}

impl PageKey {
    /// Build a key, treating an empty genre as no filter.
    pub fn new(page: u32, genre: Option<&str>) -> Self {
        Self {
            page,
            genre: genre.filter(|g| !g.is_empty()).map(str::to_string),
        }
    }
}
