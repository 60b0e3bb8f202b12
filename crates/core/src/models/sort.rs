use serde::{Deserialize, Serialize};

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Rank,
    Name,
    Price,
    /// 24h change
    Change,
    Volume,
    MarketCap,
}

impl SortColumn {
    /// All columns in table order.
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Rank,
        SortColumn::Name,
        SortColumn::Price,
        SortColumn::Change,
        SortColumn::Volume,
        SortColumn::MarketCap,
    ];

    /// Parse a column key as used by table headers ("rank", "market_cap", ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "rank" => Some(SortColumn::Rank),
            "name" => Some(SortColumn::Name),
            "price" => Some(SortColumn::Price),
            "change" => Some(SortColumn::Change),
            "volume" => Some(SortColumn::Volume),
            "market_cap" | "marketcap" => Some(SortColumn::MarketCap),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortColumn::Rank => "rank",
            SortColumn::Name => "name",
            SortColumn::Price => "price",
            SortColumn::Change => "change",
            SortColumn::Volume => "volume",
            SortColumn::MarketCap => "market_cap",
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header arrow for this direction.
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Current table sort.
///
/// Column and direction are stored together so "direction set without a
/// column" cannot be represented. `SortState::default()` is the unsorted
/// reset state, whichever column produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            active: Some((column, direction)),
        }
    }

    /// The unsorted state (fetch order).
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn column(&self) -> Option<SortColumn> {
        self.active.map(|(column, _)| column)
    }

    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, direction)| direction)
    }

    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.active.is_none()
    }

    /// Advance the three-state cycle for a click on `column`:
    /// other column → ascending → descending → unsorted.
    #[must_use]
    pub fn clicked(self, column: SortColumn) -> Self {
        match self.active {
            Some((current, SortDirection::Ascending)) if current == column => {
                Self::new(column, SortDirection::Descending)
            }
            Some((current, SortDirection::Descending)) if current == column => Self::none(),
            _ => Self::new(column, SortDirection::Ascending),
        }
    }

    /// Header indicator for `column`. Only the active column shows one.
    #[must_use]
    pub fn indicator(&self, column: SortColumn) -> Option<&'static str> {
        match self.active {
            Some((current, direction)) if current == column => Some(direction.indicator()),
            _ => None,
        }
    }
}
