use std::collections::BTreeMap;

use vaultstat_types::{AggregateRecord, MetricsRecord};

/// The last known record per key and the running total over all of them.
///
/// Invariant: `total()` equals `AggregateRecord::from_records(records)` after
/// every method returns.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    // Deterministic map: key ordering is stable.
    records: BTreeMap<String, MetricsRecord>,
    total: AggregateRecord,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap `key`'s contribution to `record`: subtract the previous record (or
    /// zero), store `record`, add it. Returns the previous record.
    pub fn apply(&mut self, key: &str, record: MetricsRecord) -> Option<MetricsRecord> {
        let previous = self.records.insert(key.to_string(), record);
        self.total.subtract(&previous.unwrap_or_default());
        self.total.add(&record);
        previous
    }

    /// Remove `key` and subtract its contribution.
    pub fn retract(&mut self, key: &str) -> Option<MetricsRecord> {
        let previous = self.records.remove(key)?;
        self.total.subtract(&previous);
        Some(previous)
    }

    #[must_use]
    pub fn total(&self) -> AggregateRecord {
        self.total
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetricsRecord> {
        self.records.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &MetricsRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.total = AggregateRecord::default();
    }
}
