use serde::{Deserialize, Serialize};

/// Display-ready row handed to the render sink.
///
/// The core computes every string; the front-end only lays them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowViewModel {
    pub id: String,
    pub rank: u32,
    pub name: String,
    /// Uppercased ticker
    pub symbol: String,
    pub image: String,
    pub price_display: String,
    pub change_display: String,
    /// Drives the up/down coloring. Absent change counts as positive (0%).
    pub change_is_positive: bool,
    pub volume_display: String,
    pub market_cap_display: String,
    pub is_favorited: bool,
}
