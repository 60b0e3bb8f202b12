use serde::{Deserialize, Serialize};

/// Search box and favorites-only checkbox, read from the UI on demand.
/// Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive substring matched against name, symbol and id
    pub search_text: String,

    /// Show only favorited assets
    pub favorites_only: bool,
}

impl FilterState {
    pub fn new(search_text: impl Into<String>, favorites_only: bool) -> Self {
        Self {
            search_text: search_text.into(),
            favorites_only,
        }
    }

    pub fn search(search_text: impl Into<String>) -> Self {
        Self::new(search_text, false)
    }

    pub fn favorites_only() -> Self {
        Self::new("", true)
    }

    /// Lowercased needle used by the predicate.
    #[must_use]
    pub fn needle(&self) -> String {
        self.search_text.to_lowercase()
    }

    /// `true` when the filter lets every record through.
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.search_text.is_empty() && !self.favorites_only
    }
}
