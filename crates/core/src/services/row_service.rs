use crate::models::asset::AssetRecord;
use crate::models::favorites::FavoriteSet;
use crate::models::row::RowViewModel;

/// Turns projected records into display-ready rows.
///
/// Formatting follows en-US conventions:
/// - prices: currency symbol, thousands separators, 2–6 fraction digits
///   (0–6 for currencies without minor units such as JPY)
/// - volume / market cap: thousands separators, up to 3 fraction digits
/// - 24h change: two decimals and a percent sign, absent shown as `0.00%`
pub struct RowService;

impl RowService {
    pub fn new() -> Self {
        Self
    }

    pub fn build_rows(
        &self,
        records: &[&AssetRecord],
        favorites: &FavoriteSet,
        currency: &str,
    ) -> Vec<RowViewModel> {
        records
            .iter()
            .map(|record| self.build_row(record, favorites, currency))
            .collect()
    }

    pub fn build_row(
        &self,
        record: &AssetRecord,
        favorites: &FavoriteSet,
        currency: &str,
    ) -> RowViewModel {
        let change = record.change_or_zero();
        RowViewModel {
            id: record.id.clone(),
            rank: record.rank,
            name: record.name.clone(),
            symbol: record.symbol.to_uppercase(),
            image: record.image.clone(),
            price_display: format_price(record.price, currency),
            change_display: format_change(Some(change)),
            change_is_positive: change >= 0.0,
            volume_display: format_number(record.volume),
            market_cap_display: format_number(record.market_cap),
            is_favorited: favorites.contains(&record.id),
        }
    }
}

impl Default for RowService {
    fn default() -> Self {
        Self::new()
    }
}

/// Currency amount, e.g. `$50,000.00`, `€0.000123`, `CHF 12.50`, `¥1,234`.
#[must_use]
pub fn format_price(value: f64, currency: &str) -> String {
    let (negative, digits) = group_digits(value, min_fraction_digits(currency), 6);
    let sign = if negative { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{} {digits}", currency.to_uppercase()),
    }
}

/// Plain grouped number, e.g. `1,234,567.891`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let (negative, digits) = group_digits(value, 0, 3);
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Percent change with two decimals. Absent counts as zero.
#[must_use]
pub fn format_change(change: Option<f64>) -> String {
    let value = match change {
        Some(c) if c.is_finite() && c != 0.0 => c,
        _ => 0.0,
    };
    format!("{value:.2}%")
}

/// ISO 4217 minor units for currencies without cents; everything else uses 2.
fn min_fraction_digits(currency: &str) -> usize {
    match currency.to_lowercase().as_str() {
        "jpy" | "krw" | "vnd" | "clp" | "isk" | "ugx" => 0,
        _ => 2,
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_lowercase().as_str() {
        "usd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        "jpy" => Some("¥"),
        "inr" => Some("₹"),
        _ => None,
    }
}

/// Round to `max_frac` digits, drop trailing zeros down to `min_frac`,
/// and insert thousands separators. Returns `(is_negative, digits)`.
fn group_digits(value: f64, min_frac: usize, max_frac: usize) -> (bool, String) {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", max_frac, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
    let negative = value < 0.0 && !is_zero;
    if frac.is_empty() {
        (negative, grouped)
    } else {
        (negative, format!("{grouped}.{frac}"))
    }
}

