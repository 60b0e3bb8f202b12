use serde::{Deserialize, Serialize};

use super::preferences::normalize_currency;
use crate::errors::CoreError;

/// Application configuration. Not user preferences: these are fixed for a
/// session and typically come from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Base URL of the CoinGecko-compatible market API.
    pub api_base_url: String,

    /// Number of assets requested per refresh.
    pub per_page: u32,

    /// Maximum number of trend samples kept per asset (most recent wins).
    /// 168 = seven days of hourly samples.
    pub trend_window: usize,

    /// Request timeout for the market fetch (native targets only).
    pub request_timeout_secs: u64,

    /// Link opened when a row is activated. `{id}` is replaced by the asset id.
    pub detail_url_template: String,

    /// Currency used when no preference has been stored yet.
    pub default_currency: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            per_page: 100,
            trend_window: 168,
            request_timeout_secs: 30,
            detail_url_template: "coin.html?id={id}".to_string(),
            default_currency: "usd".to_string(),
        }
    }
}

impl DashboardSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.per_page == 0 || self.per_page > 250 {
            return Err(CoreError::ValidationError(format!(
                "per_page must be between 1 and 250, got {}",
                self.per_page
            )));
        }
        if self.trend_window == 0 {
            return Err(CoreError::ValidationError(
                "trend_window must be at least 1".into(),
            ));
        }
        if !self.detail_url_template.contains("{id}") {
            return Err(CoreError::ValidationError(format!(
                "detail_url_template '{}' has no {{id}} placeholder",
                self.detail_url_template
            )));
        }
        normalize_currency(&self.default_currency)?;
        Ok(())
    }

    /// Detail link for an asset row.
    #[must_use]
    pub fn detail_url(&self, id: &str) -> String {
        self.detail_url_template.replace("{id}", id)
    }
}
