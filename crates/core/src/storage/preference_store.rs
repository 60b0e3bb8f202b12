use crate::errors::CoreError;
use crate::models::favorites::FavoriteSet;
use crate::models::preferences::{normalize_currency, Preferences, Theme};

use super::backend::PreferenceBackend;

/// Storage key for the quote currency ("usd").
pub const CURRENCY_KEY: &str = "currency";
/// Storage key for the theme ("dark" / "light").
pub const THEME_KEY: &str = "theme";
/// Storage key for favorites, a JSON array of asset ids.
pub const FAVORITES_KEY: &str = "favorites";

/// Typed access to user preferences on top of a string key/value backend.
///
/// Reads are forgiving: malformed stored values fall back to defaults and are
/// logged. Writes go straight to the backend with no batching.
///
/// The favorites value found when the store was opened is remembered
/// verbatim. Saving a set with exactly that membership writes the original
/// string back, so a value written by another client (any order, spacing,
/// or an explicit `[]`) survives a toggle-twice untouched.
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    opened_favorites: Option<(String, FavoriteSet)>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("currency", &self.backend.get(CURRENCY_KEY))
            .field("theme", &self.backend.get(THEME_KEY))
            .finish()
    }
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        let opened_favorites = backend.get(FAVORITES_KEY).and_then(|raw| {
            let set = FavoriteSet::from_json(&raw).ok()?;
            Some((raw, set))
        });
        Self {
            backend,
            opened_favorites,
        }
    }

    /// Raw backend access (inspection, diagnostics).
    #[must_use]
    pub fn backend(&self) -> &dyn PreferenceBackend {
        self.backend.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.get(key)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.backend.set(key, value)
    }

    /// Load currency and theme, using `default_currency` when nothing valid is stored.
    pub fn load_preferences(&self, default_currency: &str) -> Preferences {
        let currency_code = match self.backend.get(CURRENCY_KEY) {
            Some(stored) => match normalize_currency(&stored) {
                Ok(code) => code,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring stored currency");
                    default_currency.to_lowercase()
                }
            },
            None => default_currency.to_lowercase(),
        };

        let theme = match self.backend.get(THEME_KEY) {
            Some(stored) => Theme::parse(&stored).unwrap_or_else(|| {
                tracing::warn!(value = %stored, "ignoring unknown stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        };

        Preferences {
            currency_code,
            theme,
        }
    }

    /// Validate, normalize and persist a currency code. Returns the stored form.
    pub fn set_currency(&mut self, code: &str) -> Result<String, CoreError> {
        let code = normalize_currency(code)?;
        self.backend.set(CURRENCY_KEY, &code)?;
        Ok(code)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.backend.set(THEME_KEY, theme.as_str())
    }

    /// Load favorites. An unparsable stored value yields an empty set.
    pub fn load_favorites(&self) -> FavoriteSet {
        match self.backend.get(FAVORITES_KEY) {
            Some(json) => FavoriteSet::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored favorites unreadable, starting empty");
                FavoriteSet::new()
            }),
            None => FavoriteSet::new(),
        }
    }

    /// Persist favorites.
    ///
    /// Membership equal to what was stored at open time restores the stored
    /// string as-is. Otherwise an empty set removes the key and a non-empty
    /// one is written as a sorted JSON array.
    pub fn save_favorites(&mut self, favorites: &FavoriteSet) -> Result<(), CoreError> {
        if let Some((raw, opened)) = &self.opened_favorites {
            if opened == favorites {
                return self.backend.set(FAVORITES_KEY, raw);
            }
        }
        if favorites.is_empty() {
            self.backend.remove(FAVORITES_KEY)
        } else {
            self.backend.set(FAVORITES_KEY, &favorites.to_json()?)
        }
    }
}
