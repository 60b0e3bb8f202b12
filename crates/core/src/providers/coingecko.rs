use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::asset::AssetRecord;
use crate::models::settings::DashboardSettings;

const PROVIDER: &str = "CoinGecko";

/// CoinGecko `/coins/markets` provider.
///
/// - **Free**: No API key required; the public tier is rate limited.
/// - **Data**: top assets by market cap with 7-day hourly sparklines.
/// - **Endpoint**: `/coins/markets?vs_currency={cur}&order=market_cap_desc&sparkline=true`
///
/// One request per refresh returns everything the table needs, so there is
/// no per-asset lookup or id resolution here.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    per_page: u32,
    trend_window: usize,
}

impl CoinGeckoProvider {
    pub fn new(settings: &DashboardSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            per_page: settings.per_page,
            trend_window: settings.trend_window,
        }
    }

    /// Full request URL for a currency.
    #[must_use]
    pub fn markets_url(&self, currency: &str) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=true&price_change_percentage=24h",
            self.base_url,
            currency.to_lowercase(),
            self.per_page
        )
    }

    /// Decode a `/coins/markets` response body into records.
    ///
    /// Entries missing an id are skipped. Missing numeric fields become `0`
    /// (the 24h change stays absent) and are logged at debug level.
    pub fn parse_markets(body: &str, trend_window: usize) -> Result<Vec<AssetRecord>, CoreError> {
        let entries: Vec<MarketEntry> = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse markets response: {e}"),
        })?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.into_record(trend_window) {
                Some(record) => records.push(record),
                None => tracing::debug!("skipping market entry without id"),
            }
        }
        Ok(records)
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new(&DashboardSettings::default())
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    total_volume: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    sparkline_in_7d: Option<Sparkline>,
}

#[derive(Deserialize)]
struct Sparkline {
    #[serde(default)]
    price: Vec<Option<f64>>,
}

impl MarketEntry {
    fn into_record(self, trend_window: usize) -> Option<AssetRecord> {
        let id = self.id.filter(|id| !id.is_empty())?;

        let rank = self.market_cap_rank.unwrap_or_else(|| {
            log_format_issue(&id, "market_cap_rank");
            0
        });
        let price = or_zero(&id, "current_price", self.current_price);
        let volume = or_zero(&id, "total_volume", self.total_volume);
        let market_cap = or_zero(&id, "market_cap", self.market_cap);

        let mut trend: Vec<f64> = self
            .sparkline_in_7d
            .map(|s| s.price.into_iter().flatten().filter(|p| p.is_finite()).collect())
            .unwrap_or_default();
        if trend.len() > trend_window {
            trend.drain(..trend.len() - trend_window);
        }

        Some(AssetRecord {
            name: self.name.unwrap_or_else(|| id.clone()),
            symbol: self.symbol.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            rank,
            price,
            change_24h: self.price_change_percentage_24h.filter(|c| c.is_finite()),
            volume,
            market_cap,
            trend,
            id,
        })
    }
}

fn or_zero(id: &str, field: &str, value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => {
            log_format_issue(id, field);
            0.0
        }
    }
}

fn log_format_issue(id: &str, field: &str) {
    let err = CoreError::Format {
        asset: id.to_string(),
        field: field.to_string(),
    };
    tracing::debug!(error = %err, "normalized missing field");
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_assets(&self, currency: &str) -> Result<Vec<AssetRecord>, CoreError> {
        let url = self.markets_url(currency);
        tracing::debug!(provider = PROVIDER, currency, "fetching markets");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = if status.as_u16() == 429 {
                "Rate limited, retry later".to_string()
            } else {
                format!("Unexpected HTTP status {status}")
            };
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        let body = resp.text().await?;
        Self::parse_markets(&body, self.trend_window)
    }
}
