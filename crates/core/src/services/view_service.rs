use std::cmp::Ordering;

use crate::models::asset::AssetRecord;
use crate::models::dataset::DatasetCache;
use crate::models::favorites::FavoriteSet;
use crate::models::filter::FilterState;
use crate::models::sort::{SortColumn, SortDirection, SortState};

/// Derive the displayed rows: sort (stable) then filter.
///
/// Pure function of its inputs. The dataset is only borrowed, so the cached
/// snapshot can never be reordered by a projection. With no sort column the
/// fetch order is kept.
pub fn project<'a>(
    dataset: &'a [AssetRecord],
    sort: &SortState,
    filter: &FilterState,
    favorites: &FavoriteSet,
) -> Vec<&'a AssetRecord> {
    let order = sorted_indices(dataset, sort);
    apply_filter(dataset, &order, filter, favorites)
}

/// Compare two records on one column, ascending.
///
/// Numeric columns compare numerically with NaN treated as `0`; an absent
/// 24h change is `0`. Names compare case-insensitively first, then
/// lowercase before uppercase.
pub fn compare(a: &AssetRecord, b: &AssetRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Rank => a.rank.cmp(&b.rank),
        SortColumn::Name => compare_names(&a.name, &b.name),
        SortColumn::Price => compare_numbers(a.price, b.price),
        SortColumn::Change => compare_numbers(a.change_or_zero(), b.change_or_zero()),
        SortColumn::Volume => compare_numbers(a.volume, b.volume),
        SortColumn::MarketCap => compare_numbers(a.market_cap, b.market_cap),
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    normalize(a).total_cmp(&normalize(b))
}

// Folds NaN and -0.0 into 0.0 so `total_cmp` agrees with numeric equality.
fn normalize(v: f64) -> f64 {
    if v.is_nan() || v == 0.0 {
        0.0
    } else {
        v
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Indices of `dataset` in display order for `sort`.
fn sorted_indices(dataset: &[AssetRecord], sort: &SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dataset.len()).collect();
    if let (Some(column), Some(direction)) = (sort.column(), sort.direction()) {
        // sort_by is stable: equal keys keep fetch order in both directions.
        order.sort_by(|&i, &j| {
            let ord = compare(&dataset[i], &dataset[j], column);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
    order
}

fn apply_filter<'a>(
    dataset: &'a [AssetRecord],
    order: &[usize],
    filter: &FilterState,
    favorites: &FavoriteSet,
) -> Vec<&'a AssetRecord> {
    let needle = filter.needle();
    order
        .iter()
        .map(|&i| &dataset[i])
        .filter(|record| {
            record.matches_search(&needle)
                && (!filter.favorites_only || favorites.contains(&record.id))
        })
        .collect()
}

/// Sorted order remembered for one dataset generation and sort state.
#[derive(Debug, Clone)]
struct SortMemo {
    generation: u64,
    sort: SortState,
    order: Vec<usize>,
}

/// Stateful front of [`project`].
///
/// Remembers the sorted order so that filter edits and favorite toggles only
/// re-run the filter. A new dataset generation or a different sort state
/// re-sorts. Output is always identical to `project` on the same inputs.
#[derive(Debug, Clone, Default)]
pub struct ViewStateEngine {
    memo: Option<SortMemo>,
    sort_passes: u64,
}

impl ViewStateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection<'a>(
        &mut self,
        cache: &'a DatasetCache,
        sort: &SortState,
        filter: &FilterState,
        favorites: &FavoriteSet,
    ) -> Vec<&'a AssetRecord> {
        let dataset = cache.records();
        let stale = match &self.memo {
            Some(memo) => {
                memo.generation != cache.generation()
                    || memo.sort != *sort
                    || memo.order.len() != dataset.len()
            }
            None => true,
        };
        if stale {
            self.sort_passes += 1;
            tracing::debug!(
                column = ?sort.column(),
                direction = ?sort.direction(),
                rows = dataset.len(),
                "re-sorting dataset"
            );
            self.memo = Some(SortMemo {
                generation: cache.generation(),
                sort: *sort,
                order: sorted_indices(dataset, sort),
            });
        }

        match &self.memo {
            Some(memo) => apply_filter(dataset, &memo.order, filter, favorites),
            None => Vec::new(),
        }
    }

    /// Forget the remembered order.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    /// How many times the dataset has been sorted since creation.
    #[must_use]
    pub fn sort_passes(&self) -> u64 {
        self.sort_passes
    }
}
