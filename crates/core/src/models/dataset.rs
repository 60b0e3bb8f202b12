use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::asset::AssetRecord;

/// Latest successful fetch.
///
/// Replaced wholesale by `replace`; a failed fetch never touches it, so the
/// last good snapshot stays available for sorting and filtering.
#[derive(Debug, Clone, Default)]
pub struct DatasetCache {
    records: Vec<AssetRecord>,
    currency: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
    /// Bumped on every replacement so derived views can detect staleness.
    generation: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot. Records with an id already seen earlier in the
    /// same fetch are dropped. Returns how many were dropped.
    pub fn replace(
        &mut self,
        records: Vec<AssetRecord>,
        currency: &str,
        fetched_at: DateTime<Utc>,
    ) -> usize {
        let incoming = records.len();
        let mut seen = HashSet::with_capacity(incoming);
        let records: Vec<AssetRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        let dropped = incoming - records.len();
        if dropped > 0 {
            tracing::warn!(dropped, "duplicate asset ids in fetch, kept first occurrence");
        }

        self.records = records;
        self.currency = Some(currency.to_string());
        self.fetched_at = Some(fetched_at);
        self.generation += 1;
        dropped
    }

    #[must_use]
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Currency of the cached prices, `None` before the first fetch.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
