// ═══════════════════════════════════════════════════════════════════
// View Tests — project(), comparators, ViewStateEngine memoization
// ═══════════════════════════════════════════════════════════════════

use chrono::Utc;
use quickcheck_macros::quickcheck;
use std::cmp::Ordering;

use coin_dashboard_core::models::asset::AssetRecord;
use coin_dashboard_core::models::dataset::DatasetCache;
use coin_dashboard_core::models::favorites::FavoriteSet;
use coin_dashboard_core::models::filter::FilterState;
use coin_dashboard_core::models::sort::{SortColumn, SortDirection, SortState};
use coin_dashboard_core::services::view_service::{compare, project, ViewStateEngine};

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

fn market() -> Vec<AssetRecord> {
    vec![
        AssetRecord::new("bitcoin", "Bitcoin", "btc")
            .with_rank(1)
            .with_price(50_000.0)
            .with_change(2.5)
            .with_volume(30e9)
            .with_market_cap(1e12),
        AssetRecord::new("ethereum", "Ethereum", "eth")
            .with_rank(2)
            .with_price(3_000.0)
            .with_change(-1.2)
            .with_volume(15e9)
            .with_market_cap(4e11),
        AssetRecord::new("tether", "Tether", "usdt")
            .with_rank(3)
            .with_price(1.0)
            .with_volume(50e9)
            .with_market_cap(1e11),
        AssetRecord::new("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc")
            .with_rank(15)
            .with_price(50_010.0)
            .with_change(2.4)
            .with_volume(2e8)
            .with_market_cap(8e9),
        AssetRecord::new("bitget-token", "Bitget Token", "bgb")
            .with_rank(30)
            .with_price(1.0)
            .with_change(0.0)
            .with_volume(1e8)
            .with_market_cap(1.4e9),
    ]
}

fn ids<'a>(records: &[&'a AssetRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn asc(column: SortColumn) -> SortState {
    SortState::new(column, SortDirection::Ascending)
}

fn desc(column: SortColumn) -> SortState {
    SortState::new(column, SortDirection::Descending)
}

// ═══════════════════════════════════════════════════════════════════
// Sorting
// ═══════════════════════════════════════════════════════════════════

mod sorting {
    use super::*;

    #[test]
    fn unsorted_keeps_fetch_order() {
        let data = market();
        let out = project(&data, &SortState::none(), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(
            ids(&out),
            vec!["bitcoin", "ethereum", "tether", "wrapped-bitcoin", "bitget-token"]
        );
    }

    #[test]
    fn price_ascending_is_non_decreasing() {
        let data = market();
        let out = project(&data, &asc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(out.len(), data.len());
        for pair in out.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn equal_prices_keep_fetch_order_both_directions() {
        let data = market();
        // tether and bitget-token both cost 1.0; tether comes first in the fetch.
        let up = project(&data, &asc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(&ids(&up)[..2], &["tether", "bitget-token"]);

        let down = project(&data, &desc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(&ids(&down)[3..], &["tether", "bitget-token"]);
    }

    #[test]
    fn rank_descending() {
        let data = market();
        let out = project(&data, &desc(SortColumn::Rank), &FilterState::default(), &FavoriteSet::new());
        let ranks: Vec<u32> = out.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![30, 15, 3, 2, 1]);
    }

    #[test]
    fn name_ascending_is_case_insensitive() {
        let data = vec![
            AssetRecord::new("b", "beta", "b"),
            AssetRecord::new("a", "Alpha", "a"),
            AssetRecord::new("c", "Gamma", "c"),
            AssetRecord::new("d", "delta", "d"),
        ];
        let out = project(&data, &asc(SortColumn::Name), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(ids(&out), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn name_ties_put_lowercase_first() {
        let upper = AssetRecord::new("u", "Apple", "u");
        let lower = AssetRecord::new("l", "apple", "l");
        assert_eq!(compare(&lower, &upper, SortColumn::Name), Ordering::Less);
        assert_eq!(compare(&upper, &upper, SortColumn::Name), Ordering::Equal);
    }

    #[test]
    fn missing_change_sorts_as_zero() {
        let data = market();
        let out = project(&data, &asc(SortColumn::Change), &FilterState::default(), &FavoriteSet::new());
        // tether (absent) and bitget-token (0.0) tie at zero, fetch order kept.
        assert_eq!(
            ids(&out),
            vec!["ethereum", "tether", "bitget-token", "wrapped-bitcoin", "bitcoin"]
        );
    }

    #[test]
    fn volume_and_market_cap() {
        let data = market();
        let by_volume = project(&data, &desc(SortColumn::Volume), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(ids(&by_volume)[0], "tether");

        let by_cap = project(&data, &asc(SortColumn::MarketCap), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(ids(&by_cap)[0], "bitget-token");
        assert_eq!(ids(&by_cap)[4], "bitcoin");
    }

    #[test]
    fn nan_compares_as_zero() {
        let nan = AssetRecord::new("n", "N", "n").with_price(f64::NAN);
        let zero = AssetRecord::new("z", "Z", "z").with_price(0.0);
        let neg_zero = AssetRecord::new("m", "M", "m").with_price(-0.0);
        assert_eq!(compare(&nan, &zero, SortColumn::Price), Ordering::Equal);
        assert_eq!(compare(&neg_zero, &zero, SortColumn::Price), Ordering::Equal);
    }

    #[test]
    fn dataset_is_not_reordered() {
        let data = market();
        let before = data.clone();
        let _ = project(&data, &desc(SortColumn::Price), &FilterState::search("bit"), &FavoriteSet::new());
        assert_eq!(data, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Filtering
// ═══════════════════════════════════════════════════════════════════

mod filtering {
    use super::*;

    #[test]
    fn search_bit_matches_name_symbol_or_id() {
        let data = market();
        let out = project(&data, &SortState::none(), &FilterState::search("bit"), &FavoriteSet::new());
        let expected: Vec<&str> = data
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains("bit")
                    || r.symbol.to_lowercase().contains("bit")
                    || r.id.to_lowercase().contains("bit")
            })
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids(&out), expected);
        assert_eq!(ids(&out), vec!["bitcoin", "wrapped-bitcoin", "bitget-token"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let data = market();
        let out = project(&data, &SortState::none(), &FilterState::search("USDT"), &FavoriteSet::new());
        assert_eq!(ids(&out), vec!["tether"]);
    }

    #[test]
    fn no_match_is_empty() {
        let data = market();
        let out = project(&data, &SortState::none(), &FilterState::search("dogecoin"), &FavoriteSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn favorites_only_with_empty_favorites_is_empty() {
        let data = market();
        let out = project(&data, &SortState::none(), &FilterState::favorites_only(), &FavoriteSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn favorites_only_and_search_are_anded() {
        let data = market();
        let favs: FavoriteSet = ["bitcoin", "ethereum"].into_iter().collect();
        let out = project(&data, &SortState::none(), &FilterState::new("bit", true), &favs);
        assert_eq!(ids(&out), vec!["bitcoin"]);
    }

    #[test]
    fn favorites_unknown_ids_are_harmless() {
        let data = market();
        let favs: FavoriteSet = ["cardano", "tether"].into_iter().collect();
        let out = project(&data, &SortState::none(), &FilterState::favorites_only(), &favs);
        assert_eq!(ids(&out), vec!["tether"]);
    }

    #[test]
    fn filter_applies_after_sort() {
        let data = market();
        let out = project(&data, &desc(SortColumn::Price), &FilterState::search("bit"), &FavoriteSet::new());
        assert_eq!(ids(&out), vec!["wrapped-bitcoin", "bitcoin", "bitget-token"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Scenario
// ═══════════════════════════════════════════════════════════════════

mod scenario {
    use super::*;

    #[test]
    fn btc_eth_sort_then_favorites() {
        let data = vec![
            AssetRecord::new("btc", "Bitcoin", "btc").with_rank(1).with_price(50_000.0),
            AssetRecord::new("eth", "Ethereum", "eth").with_rank(2).with_price(3_000.0),
        ];
        let sort = desc(SortColumn::Price);
        let out = project(&data, &sort, &FilterState::default(), &FavoriteSet::new());
        assert_eq!(ids(&out), vec!["btc", "eth"]);

        let mut favs = FavoriteSet::new();
        favs.toggle("eth");
        let out = project(&data, &sort, &FilterState::favorites_only(), &favs);
        assert_eq!(ids(&out), vec!["eth"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ViewStateEngine
// ═══════════════════════════════════════════════════════════════════

mod engine {
    use super::*;

    fn cache() -> DatasetCache {
        let mut cache = DatasetCache::new();
        cache.replace(market(), "usd", Utc::now());
        cache
    }

    #[test]
    fn matches_pure_projection() {
        let cache = cache();
        let mut engine = ViewStateEngine::new();
        let favs: FavoriteSet = ["ethereum", "bitcoin"].into_iter().collect();
        for sort in [SortState::none(), asc(SortColumn::Name), desc(SortColumn::Change)] {
            for filter in [
                FilterState::default(),
                FilterState::search("bit"),
                FilterState::new("", true),
                FilterState::new("eth", true),
            ] {
                let expected = project(cache.records(), &sort, &filter, &favs);
                let actual = engine.projection(&cache, &sort, &filter, &favs);
                assert_eq!(ids(&actual), ids(&expected));
            }
        }
    }

    #[test]
    fn filter_and_favorite_changes_do_not_resort() {
        let cache = cache();
        let mut engine = ViewStateEngine::new();
        let sort = asc(SortColumn::Price);
        let mut favs = FavoriteSet::new();

        engine.projection(&cache, &sort, &FilterState::default(), &favs);
        assert_eq!(engine.sort_passes(), 1);

        engine.projection(&cache, &sort, &FilterState::search("bit"), &favs);
        favs.toggle("tether");
        let out = engine.projection(&cache, &sort, &FilterState::favorites_only(), &favs);
        assert_eq!(ids(&out), vec!["tether"]);
        assert_eq!(engine.sort_passes(), 1);
    }

    #[test]
    fn sort_change_resorts() {
        let cache = cache();
        let mut engine = ViewStateEngine::new();
        engine.projection(&cache, &asc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        engine.projection(&cache, &desc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        assert_eq!(engine.sort_passes(), 2);
    }

    #[test]
    fn new_dataset_generation_resorts() {
        let mut cache = cache();
        let mut engine = ViewStateEngine::new();
        let sort = asc(SortColumn::Rank);
        engine.projection(&cache, &sort, &FilterState::default(), &FavoriteSet::new());

        cache.replace(
            vec![AssetRecord::new("solana", "Solana", "sol").with_rank(5)],
            "usd",
            Utc::now(),
        );
        let out = engine.projection(&cache, &sort, &FilterState::default(), &FavoriteSet::new());
        assert_eq!(ids(&out), vec!["solana"]);
        assert_eq!(engine.sort_passes(), 2);
    }

    #[test]
    fn invalidate_forces_resort() {
        let cache = cache();
        let mut engine = ViewStateEngine::new();
        let sort = SortState::none();
        engine.projection(&cache, &sort, &FilterState::default(), &FavoriteSet::new());
        engine.invalidate();
        engine.projection(&cache, &sort, &FilterState::default(), &FavoriteSet::new());
        assert_eq!(engine.sort_passes(), 2);
    }

    #[test]
    fn empty_cache_projects_nothing() {
        let cache = DatasetCache::new();
        let mut engine = ViewStateEngine::new();
        let out = engine.projection(&cache, &asc(SortColumn::Price), &FilterState::default(), &FavoriteSet::new());
        assert!(out.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════

fn from_prices(prices: &[u8]) -> Vec<AssetRecord> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            AssetRecord::new(format!("id{i}"), format!("Asset {}", p % 7), format!("s{i}"))
                .with_rank(i as u32 + 1)
                .with_price(f64::from(*p % 16))
        })
        .collect()
}

#[quickcheck]
fn projection_is_idempotent(prices: Vec<u8>, favorite_mask: Vec<bool>, descending: bool) -> bool {
    let data = from_prices(&prices);
    let favs: FavoriteSet = data
        .iter()
        .zip(favorite_mask.iter())
        .filter(|(_, fav)| **fav)
        .map(|(r, _)| r.id.clone())
        .collect();
    let sort = if descending { desc(SortColumn::Name) } else { asc(SortColumn::Price) };
    let filter = FilterState::new("asset 3", !favs.is_empty());
    let first = ids(&project(&data, &sort, &filter, &favs));
    let second = ids(&project(&data, &sort, &filter, &favs));
    first == second
}

#[quickcheck]
fn price_sort_is_ordered_and_stable(prices: Vec<u8>, descending: bool) -> bool {
    let data = from_prices(&prices);
    let sort = if descending { desc(SortColumn::Price) } else { asc(SortColumn::Price) };
    let out = project(&data, &sort, &FilterState::default(), &FavoriteSet::new());
    if out.len() != data.len() {
        return false;
    }
    out.windows(2).all(|pair| {
        let (a, b) = (pair[0], pair[1]);
        let ordered = if descending { a.price >= b.price } else { a.price <= b.price };
        // Equal keys keep input order: rank is the input position.
        let stable = a.price != b.price || a.rank < b.rank;
        ordered && stable
    })
}

#[quickcheck]
fn filter_keeps_relative_order(prices: Vec<u8>) -> bool {
    let data = from_prices(&prices);
    let out = project(&data, &SortState::none(), &FilterState::search("asset 2"), &FavoriteSet::new());
    out.windows(2).all(|pair| pair[0].rank < pair[1].rank)
        && out.iter().all(|r| r.name.to_lowercase().contains("asset 2"))
}
