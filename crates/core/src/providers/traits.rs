use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetRecord;

/// Source of market snapshots (SOLID: Dependency Inversion).
///
/// The dashboard only ever asks for "the current market in this currency".
/// Swapping the data vendor means writing one new implementation of this
/// trait; the view-state engine never sees provider types.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full asset list with prices denominated in `currency`
    /// (lowercase code, e.g. "usd"), in the provider's ranking order.
    ///
    /// Fails with `CoreError::Api` / `CoreError::Network` on transport or
    /// payload errors. Missing numeric fields are not errors.
    async fn fetch_assets(&self, currency: &str) -> Result<Vec<AssetRecord>, CoreError>;
}
