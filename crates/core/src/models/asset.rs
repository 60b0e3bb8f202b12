use serde::{Deserialize, Serialize};

/// One market snapshot item as returned by a fetch.
///
/// Records are immutable once built. A refresh replaces the whole set;
/// there is no partial merge between fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Provider identifier (e.g., "bitcoin"). Unique within one fetch.
    pub id: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol as delivered by the provider (e.g., "btc")
    pub symbol: String,

    /// Image URL for the row icon
    pub image: String,

    /// Market-cap rank, `0` when the provider did not rank the asset
    pub rank: u32,

    /// Current price in the dataset currency
    pub price: f64,

    /// 24h price change in percent. Absent for some freshly listed assets.
    #[serde(default)]
    pub change_24h: Option<f64>,

    /// 24h traded volume in the dataset currency
    pub volume: f64,

    /// Market capitalization in the dataset currency
    pub market_cap: f64,

    /// Recent price samples, oldest first, bounded by the trend window
    #[serde(default)]
    pub trend: Vec<f64>,
}

impl AssetRecord {
    /// Minimal constructor; numeric fields default to zero and the trend is empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            rank: 0,
            price: 0.0,
            change_24h: None,
            volume: 0.0,
            market_cap: 0.0,
            trend: Vec::new(),
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_change(mut self, change_24h: f64) -> Self {
        self.change_24h = Some(change_24h);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_trend(mut self, trend: Vec<f64>) -> Self {
        self.trend = trend;
        self
    }

    /// 24h change used for display, coloring and sorting: absent or
    /// non-finite counts as `0`.
    #[must_use]
    pub fn change_or_zero(&self) -> f64 {
        self.change_24h.filter(|c| c.is_finite()).unwrap_or(0.0)
    }

    /// Case-insensitive match of `needle` against name, symbol and id.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}
