use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use vocably_core::{UsageKind, VocabRecord};
use vocably_store::VocabStore;

/// A not-yet-flushed usage update for one word, coalescing any number of
/// staged events.
#[derive(Debug, Clone)]
pub struct StagedDelta {
    /// Kind of the earliest staged event; decides whether a flush may
    /// create a missing record.
    pub first_kind: UsageKind,
    /// Staged wrong-use increments.
    pub wrong_inc: u32,
    /// Staged right-use increments.
    pub right_inc: u32,
    /// Timestamp of the latest staged event.
    pub last_used: DateTime<Utc>,
}

impl StagedDelta {
    fn from_kind(kind: UsageKind, at: DateTime<Utc>) -> Self {
        let mut delta = Self {
            first_kind: kind,
            wrong_inc: 0,
            right_inc: 0,
            last_used: at,
        };
        delta.bump(kind, at);
        delta
    }

    fn bump(&mut self, kind: UsageKind, at: DateTime<Utc>) {
        if kind.counts_as_wrong() {
            self.wrong_inc += 1;
        } else {
            self.right_inc += 1;
        }
        self.last_used = self.last_used.max(at);
    }

    /// Folds another delta into this one, keeping the earliest kind.
    fn absorb(&mut self, other: &StagedDelta) {
        self.wrong_inc += other.wrong_inc;
        self.right_inc += other.right_inc;
        self.last_used = self.last_used.max(other.last_used);
    }
}

#[derive(Default)]
struct UserStage {
    deltas: HashMap<String, StagedDelta>,
    has_unsaved: bool,
}

/// Outcome of one flush cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Deltas applied to the durable store.
    pub flushed: usize,
    /// Deltas whose write failed and were re-staged for the next cycle.
    pub retried: usize,
}

/// Per-user staged usage deltas awaiting write-back.
///
/// Every update stages its delta before the synchronous durable write
/// and discards it on success, so a staged entry that survives is
/// exactly a failed write waiting to be retried by the next flush.
/// One coarse lock guards the whole map; contention stays negligible at
/// the engine's expected concurrency.
pub struct WriteBehindCache {
    users: Mutex<HashMap<String, UserStage>>,
    mastery_threshold: i32,
}

impl WriteBehindCache {
    /// Creates an empty staging cache.
    pub fn new(mastery_threshold: i32) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            mastery_threshold,
        }
    }

    /// Stages one usage event for `(user_id, word)`, merging with any
    /// delta already staged for the key.
    pub async fn stage(&self, user_id: &str, word: &str, kind: UsageKind) {
        let now = Utc::now();
        let mut users = self.users.lock().await;
        let stage = users.entry(user_id.to_string()).or_default();
        match stage.deltas.get_mut(word) {
            Some(delta) => delta.bump(kind, now),
            None => {
                stage
                    .deltas
                    .insert(word.to_string(), StagedDelta::from_kind(kind, now));
            }
        }
        stage.has_unsaved = true;
    }

    /// Drops the staged delta for `(user_id, word)` after its update
    /// reached durable storage.
    pub async fn discard(&self, user_id: &str, word: &str) {
        let mut users = self.users.lock().await;
        if let Some(stage) = users.get_mut(user_id) {
            stage.deltas.remove(word);
            if stage.deltas.is_empty() {
                stage.has_unsaved = false;
            }
        }
    }

    /// Drops every staged delta for the user (after deactivation).
    pub async fn drop_user(&self, user_id: &str) {
        self.users.lock().await.remove(user_id);
    }

    /// Whether the user has staged deltas awaiting flush.
    pub async fn has_unsaved(&self, user_id: &str) -> bool {
        self.users
            .lock()
            .await
            .get(user_id)
            .is_some_and(|s| s.has_unsaved)
    }

    /// Total staged deltas across all users.
    pub async fn staged_count(&self) -> usize {
        self.users
            .lock()
            .await
            .values()
            .map(|s| s.deltas.len())
            .sum()
    }

    /// Applies every staged delta to the store, read-modify-write per
    /// word. A delta whose write fails is re-staged (merged with
    /// anything staged meanwhile) and retried on the next cycle; sibling
    /// deltas in the same batch are unaffected.
    pub async fn flush(&self, store: &dyn VocabStore) -> FlushReport {
        // Drain under the lock, apply outside it so staging never stalls
        // behind store I/O.
        let drained: Vec<(String, Vec<(String, StagedDelta)>)> = {
            let mut users = self.users.lock().await;
            users
                .iter_mut()
                .filter(|(_, stage)| stage.has_unsaved)
                .map(|(user_id, stage)| {
                    stage.has_unsaved = false;
                    (
                        user_id.clone(),
                        std::mem::take(&mut stage.deltas).into_iter().collect(),
                    )
                })
                .collect()
        };

        let mut report = FlushReport::default();
        let mut failed: Vec<(String, String, StagedDelta)> = Vec::new();

        for (user_id, deltas) in drained {
            for (word, delta) in deltas {
                match self.apply_delta(store, &user_id, &word, &delta).await {
                    Ok(()) => report.flushed += 1,
                    Err(e) => {
                        tracing::warn!(
                            "Flush failed for '{}' (user {}): {}; will retry",
                            word,
                            user_id,
                            e
                        );
                        report.retried += 1;
                        failed.push((user_id.clone(), word, delta));
                    }
                }
            }
        }

        if !failed.is_empty() {
            let mut users = self.users.lock().await;
            for (user_id, word, delta) in failed {
                let stage = users.entry(user_id).or_default();
                stage
                    .deltas
                    .entry(word)
                    .and_modify(|staged| staged.absorb(&delta))
                    .or_insert(delta);
                stage.has_unsaved = true;
            }
        }

        report
    }

    async fn apply_delta(
        &self,
        store: &dyn VocabStore,
        user_id: &str,
        word: &str,
        delta: &StagedDelta,
    ) -> vocably_core::VocablyResult<()> {
        let mut record = match store.find_active(user_id, word).await? {
            Some(record) => record,
            None => {
                // A word never reaches durable storage through a
                // right-use alone.
                if delta.first_kind == UsageKind::RightUse {
                    tracing::debug!("Dropping staged right-use for untracked '{word}'");
                    return Ok(());
                }
                let mut record =
                    VocabRecord::new(user_id, word, delta.first_kind.into(), self.mastery_threshold);
                record.wrong_use_count = 0;
                record.right_use_count = 0;
                record
            }
        };

        record.wrong_use_count += delta.wrong_inc;
        record.right_use_count += delta.right_inc;
        record.recompute_mastery(self.mastery_threshold);
        record.last_used_at = record.last_used_at.max(delta.last_used);
        store.upsert(record).await
    }
}
