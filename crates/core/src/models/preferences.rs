use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Color scheme of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Stored representation ("dark" / "light").
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Quote currency of the dataset, lowercase (e.g., "usd", "eur").
    /// Changing it requires a refetch since prices are denominated in it.
    pub currency_code: String,

    /// Presentation only; changing it never refetches.
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency_code: "usd".to_string(),
            theme: Theme::Dark,
        }
    }
}

/// Validate and normalize a currency code.
/// Must be exactly 3 ASCII letters; returned lowercase.
pub fn normalize_currency(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim().to_lowercase();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., usd, eur, gbp)"
        )));
    }
    Ok(trimmed)
}
