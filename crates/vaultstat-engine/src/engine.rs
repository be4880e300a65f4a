use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use vaultstat_collect::collect;
use vaultstat_exclude::ExcludeSet;
use vaultstat_io_port::{Vault, VaultError};
use vaultstat_types::{AggregateRecord, ChangeEvent, DeletionPolicy, MetricsRecord};

use crate::backlog::Backlog;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub exclude: ExcludeSet,
    pub deletion: DeletionPolicy,
}

/// Outcome counts of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrainReport {
    /// Keys taken off the backlog.
    pub processed: usize,
    /// Keys whose record was (re)computed and stored.
    pub applied: usize,
    /// Keys skipped because an exclude token matched.
    pub excluded: usize,
    /// Keys with no live file or structure whose stored record was removed.
    pub retracted: usize,
    /// Keys with no live file or structure and nothing removed.
    pub missing: usize,
    /// Keys whose lookup failed; the stored record is untouched.
    pub failed: usize,
}

impl DrainReport {
    fn record(&mut self, outcome: Outcome) {
        self.processed += 1;
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Excluded => self.excluded += 1,
            Outcome::Retracted => self.retracted += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    Excluded,
    Retracted,
    Missing,
    Failed,
}

/// Incremental aggregator over a [`Vault`].
///
/// Changes are enqueued by key and folded into the running total by
/// [`drain`](Self::drain). At most one drain runs at a time; enqueues are
/// accepted while it runs and picked up by the same pass.
pub struct Engine {
    vault: Arc<dyn Vault>,
    exclude: RwLock<ExcludeSet>,
    deletion: DeletionPolicy,
    backlog: Mutex<Backlog>,
    ledger: Mutex<Ledger>,
    drain_gate: tokio::sync::Mutex<()>,
    view: watch::Sender<AggregateRecord>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("deletion", &self.deletion)
            .field("pending", &self.pending())
            .field("recorded", &self.ledger().len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(vault: Arc<dyn Vault>, config: EngineConfig) -> Self {
        let (view, _) = watch::channel(AggregateRecord::default());
        Self {
            vault,
            exclude: RwLock::new(config.exclude),
            deletion: config.deletion,
            backlog: Mutex::new(Backlog::new()),
            ledger: Mutex::new(Ledger::new()),
            drain_gate: tokio::sync::Mutex::new(()),
            view,
        }
    }

    fn backlog(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `key` for recomputation. Returns `false` if it was already queued.
    pub fn enqueue(&self, key: &str) -> bool {
        self.backlog().push(key)
    }

    /// Queue every key touched by `event`.
    pub fn notify(&self, event: &ChangeEvent) {
        for key in event.keys() {
            if self.enqueue(key) {
                debug!(key, ?event, "queued");
            }
        }
    }

    /// Queue every key the vault currently lists. Returns how many were newly
    /// queued.
    pub async fn enumerate(&self) -> Result<usize, VaultError> {
        let keys = self.vault.list().await?;
        let mut backlog = self.backlog();
        let queued = keys.iter().filter(|key| backlog.push(key)).count();
        drop(backlog);
        info!(listed = keys.len(), queued, "enumerated vault");
        Ok(queued)
    }

    /// Process the backlog until it is empty, then publish the total.
    pub async fn drain(&self) -> DrainReport {
        let _gate = self.drain_gate.lock().await;
        let mut report = DrainReport::default();

        while let Some(key) = self.pop() {
            let outcome = self.process(&key).await;
            report.record(outcome);
        }

        if report.processed > 0 {
            info!(
                processed = report.processed,
                applied = report.applied,
                excluded = report.excluded,
                retracted = report.retracted,
                missing = report.missing,
                failed = report.failed,
                "drain pass complete"
            );
        }
        self.publish();
        report
    }

    fn pop(&self) -> Option<String> {
        self.backlog().pop()
    }

    async fn process(&self, key: &str) -> Outcome {
        if let Some(token) = self.excluded_by(key) {
            debug!(key, token = %token, "excluded");
            return Outcome::Excluded;
        }

        let file = match self.vault.resolve(key).await {
            Ok(Some(file)) => file,
            Ok(None) => {
                self.expand(key).await;
                return self.gone(key, "no live file");
            }
            Err(err) => {
                warn!(key, error = %err, "resolve failed, keeping stored record");
                return Outcome::Failed;
            }
        };

        match collect(self.vault.as_ref(), &file).await {
            Some(record) => self.apply_unless_excluded(key, record),
            None => self.gone(key, "structure unavailable"),
        }
    }

    /// Exclusion is checked again under the ledger lock, the same lock
    /// `set_exclude` holds while it swaps the set.
    fn apply_unless_excluded(&self, key: &str, record: MetricsRecord) -> Outcome {
        let mut ledger = self.ledger();
        if let Some(token) = self.excluded_by(key) {
            debug!(key, token = %token, "excluded while collecting");
            return Outcome::Excluded;
        }
        ledger.apply(key, record);
        Outcome::Applied
    }

    /// A key with no live file may name a directory that was moved, removed or
    /// created. Queue the recorded keys below it and the keys now listed below it.
    async fn expand(&self, key: &str) {
        let prefix = format!("{}/", key.trim_end_matches('/'));
        let stale: Vec<String> = self
            .ledger()
            .keys()
            .filter(|recorded| recorded.starts_with(&prefix))
            .map(str::to_string)
            .collect();
        let listed = match self.vault.list_under(key).await {
            Ok(keys) => keys,
            Err(err) => {
                warn!(key, error = %err, "listing below key failed");
                Vec::new()
            }
        };
        if stale.is_empty() && listed.is_empty() {
            return;
        }

        let mut backlog = self.backlog();
        let queued = stale
            .iter()
            .chain(&listed)
            .filter(|child| backlog.push(child))
            .count();
        drop(backlog);
        debug!(key, stale = stale.len(), listed = listed.len(), queued, "expanded directory");
    }

    fn excluded_by(&self, key: &str) -> Option<String> {
        let exclude = self.exclude.read().unwrap_or_else(PoisonError::into_inner);
        exclude.matching_token(key).map(str::to_string)
    }

    fn gone(&self, key: &str, reason: &str) -> Outcome {
        match self.deletion {
            DeletionPolicy::Retract => match self.retract(key) {
                Some(_) => {
                    debug!(key, reason, "retracted");
                    Outcome::Retracted
                }
                None => Outcome::Missing,
            },
            DeletionPolicy::Retain => {
                debug!(key, reason, "nothing collected, stored record retained");
                Outcome::Missing
            }
        }
    }

    /// Replace `key`'s contribution to the total with `record`.
    pub fn apply(&self, key: &str, record: MetricsRecord) -> Option<MetricsRecord> {
        self.ledger().apply(key, record)
    }

    /// Remove `key`'s stored record and its contribution.
    pub fn retract(&self, key: &str) -> Option<MetricsRecord> {
        self.ledger().retract(key)
    }

    /// Retract `key` and publish the new total right away.
    pub fn remove(&self, key: &str) -> Option<MetricsRecord> {
        let removed = self.retract(key);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Replace the exclude set. Stored records of keys it now excludes are
    /// retracted; keys it no longer excludes need to be enqueued again.
    pub fn set_exclude(&self, exclude: ExcludeSet) {
        let mut ledger = self.ledger();
        let dropped: Vec<String> = ledger
            .keys()
            .filter(|key| exclude.is_excluded(key))
            .map(str::to_string)
            .collect();
        for key in &dropped {
            ledger.retract(key);
        }
        *self.exclude.write().unwrap_or_else(PoisonError::into_inner) = exclude;
        drop(ledger);

        if !dropped.is_empty() {
            info!(retracted = dropped.len(), "exclude set changed");
            self.publish();
        }
    }

    #[must_use]
    pub fn exclude(&self) -> ExcludeSet {
        self.exclude
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn deletion(&self) -> DeletionPolicy {
        self.deletion
    }

    /// Current total, including applies not yet published.
    #[must_use]
    pub fn snapshot(&self) -> AggregateRecord {
        self.ledger().total()
    }

    #[must_use]
    pub fn record(&self, key: &str) -> Option<MetricsRecord> {
        self.ledger().get(key).copied()
    }

    #[must_use]
    pub fn recorded_keys(&self) -> Vec<String> {
        self.ledger().keys().map(str::to_string).collect()
    }

    /// Keys waiting in the backlog.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.backlog().len()
    }

    /// Read-only view of the total, updated at the end of every drain.
    pub fn subscribe(&self) -> watch::Receiver<AggregateRecord> {
        self.view.subscribe()
    }

    /// Forget every queued key and stored record.
    pub fn reset(&self) {
        self.backlog().clear();
        self.ledger().clear();
        self.publish();
    }

    fn publish(&self) {
        let total = self.snapshot();
        self.view.send_if_modified(|current| {
            if *current == total {
                false
            } else {
                *current = total;
                true
            }
        });
    }
}
