use serde::{Deserialize, Serialize};

use super::filter::FilterState;
use super::preferences::Theme;
use super::sort::SortColumn;

/// A user action, consumed by `Dashboard::dispatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Click on a column header; advances that column's sort cycle.
    SetSort(SortColumn),
    /// New search text / favorites-only checkbox values.
    SetFilter(FilterState),
    /// Click on a row's star.
    ToggleFavorite(String),
    /// Currency selector change. Triggers a refetch.
    SetCurrency(String),
    SetTheme(Theme),
    ToggleTheme,
    /// Refresh button.
    Refresh,
    /// Click on a row (outside the star).
    ActivateRow(String),
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The view was re-derived and re-rendered.
    Rendered,
    /// A fetch succeeded and replaced the dataset.
    Refreshed { assets: usize },
    /// A fetch failed; the previous dataset and view are still shown.
    RefreshFailed { reason: String },
    ThemeChanged(Theme),
    /// The front-end should open the asset detail page.
    Navigate { url: String },
}
