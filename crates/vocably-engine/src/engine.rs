use crate::cache::{FlushReport, WriteBehindCache};
use crate::pool::{UpdateJob, UpdatePool};
use crate::saver::AutoSaver;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use vocably_core::{
    EngineConfig, RejectReason, SaveMode, UsageKind, UsageOutcome, VocabRecord, VocabStats,
    VocablyError, VocablyResult,
};
use vocably_lexicon::{has_cjk, Normalizer};
use vocably_recommend::{EmbeddingCache, EmbeddingProvider, Recommender};
use vocably_store::{VocabFilter, VocabStore};

/// A tracked word detected inside conversation text, possibly inflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedWord {
    /// The canonical tracked word.
    pub word: String,
    /// The surface form found in the text.
    pub variant: String,
}

/// The shared innards the worker pool, timer, and facade all drive.
pub(crate) struct EngineCore {
    pub(crate) store: Arc<dyn VocabStore>,
    pub(crate) normalizer: Arc<Normalizer>,
    pub(crate) staged: WriteBehindCache,
    pub(crate) embedding_cache: Arc<EmbeddingCache>,
    pub(crate) mastery_threshold: i32,
    pub(crate) update_timeout: Duration,
}

impl EngineCore {
    /// Applies one usage event: normalize, load, mutate counters,
    /// recompute the mastery invariant, persist.
    ///
    /// The only writer of vocabulary counters in the system.
    pub(crate) async fn apply_usage(
        &self,
        user_id: &str,
        raw_word: &str,
        kind: UsageKind,
    ) -> VocablyResult<UsageOutcome> {
        let trimmed = raw_word.trim();
        if trimmed.is_empty() {
            tracing::debug!("Empty word for user {}", user_id);
            return Ok(UsageOutcome::Rejected(RejectReason::EmptyWord));
        }
        if has_cjk(trimmed) {
            tracing::debug!("Skipping non-English word: {}", trimmed);
            return Ok(UsageOutcome::Rejected(RejectReason::NonEnglish));
        }

        let word = self.normalizer.normalize(trimmed);
        if word.is_empty() {
            return Ok(UsageOutcome::Rejected(RejectReason::EmptyWord));
        }

        let existing = self.store.find_active(user_id, &word).await?;
        let (record, created) = match existing {
            None => {
                if kind == UsageKind::RightUse {
                    // A word cannot be used "correctly" before it was
                    // ever worth tracking; the store stays untouched.
                    tracing::debug!("Right-use for untracked '{}' ignored", word);
                    return Ok(UsageOutcome::Rejected(RejectReason::UntrackedRightUse));
                }
                (
                    VocabRecord::new(user_id, &word, kind.into(), self.mastery_threshold),
                    true,
                )
            }
            Some(mut record) => {
                if !record.derived_fields_consistent(self.mastery_threshold) {
                    tracing::warn!(
                        "Record '{}' (user {}) had stale derived fields; repairing from counters",
                        word,
                        user_id
                    );
                }
                if kind.counts_as_wrong() {
                    record.wrong_use_count += 1;
                } else {
                    record.right_use_count += 1;
                }
                record.recompute_mastery(self.mastery_threshold);
                record.last_used_at = Utc::now();
                (record, false)
            }
        };

        // The embedding of a canonical string is stable, but a stale
        // vector must never outlive a canonicalization change.
        self.embedding_cache.evict(&word);

        // Write-back protocol: stage first, write synchronously, clear
        // the stage on success. A surviving stage is a pending retry.
        self.staged.stage(user_id, &word, kind).await;
        match self.store.upsert(record.clone()).await {
            Ok(()) => {
                self.staged.discard(user_id, &word).await;
                tracing::debug!(
                    "Applied {:?} to '{}' (user {}): score {}",
                    kind,
                    word,
                    user_id,
                    record.mastery_score
                );
                if created {
                    Ok(UsageOutcome::Created(record))
                } else {
                    Ok(UsageOutcome::Updated(record))
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Synchronous write for '{}' failed ({}); delta staged for retry",
                    word,
                    e
                );
                Err(e)
            }
        }
    }

    /// Pool entry point: bounded, never propagates.
    pub(crate) async fn run_update(&self, user_id: &str, word: &str, kind: UsageKind) {
        match tokio::time::timeout(self.update_timeout, self.apply_usage(user_id, word, kind)).await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!("Usage update failed for '{}': {}", word, e),
            Err(_) => tracing::warn!(
                "Usage update for '{}' timed out after {:?}",
                word,
                self.update_timeout
            ),
        }
    }

    pub(crate) async fn flush_staged(&self) -> FlushReport {
        self.staged.flush(self.store.as_ref()).await
    }
}

/// The vocabulary engine facade: usage reporting, recommendations, bulk
/// import, statistics, and lifecycle.
///
/// Construct inside a tokio runtime; [`VocabEngine::new`] spawns the
/// update workers (and the auto-save timer in
/// [`SaveMode::AutoSave`]). Call [`VocabEngine::finalize`] before the
/// process exits.
pub struct VocabEngine {
    pub(crate) core: Arc<EngineCore>,
    recommender: Recommender,
    pool: Mutex<Option<UpdatePool>>,
    saver: Mutex<Option<AutoSaver>>,
    save_mode: Mutex<SaveMode>,
    config: EngineConfig,
}

impl VocabEngine {
    /// Builds an engine with the built-in rule-based normalizer.
    pub fn new(
        store: Arc<dyn VocabStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
    ) -> VocablyResult<Self> {
        Self::with_normalizer(store, embedder, Arc::new(Normalizer::rule_based()), config)
    }

    /// Builds an engine around an injected normalizer (a deployment
    /// wrapping a real lemmatizer/tagger).
    pub fn with_normalizer(
        store: Arc<dyn VocabStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        normalizer: Arc<Normalizer>,
        config: EngineConfig,
    ) -> VocablyResult<Self> {
        config.validate()?;

        let embedding_cache = Arc::new(EmbeddingCache::new());
        let core = Arc::new(EngineCore {
            store: Arc::clone(&store),
            normalizer,
            staged: WriteBehindCache::new(config.mastery_threshold),
            embedding_cache: Arc::clone(&embedding_cache),
            mastery_threshold: config.mastery_threshold,
            update_timeout: Duration::from_secs(config.update_timeout_secs),
        });

        let recommender = Recommender::new(store, embedder, embedding_cache);
        let pool = UpdatePool::spawn(config.worker_count, Arc::clone(&core));
        let saver = match config.save_mode {
            SaveMode::AutoSave => Some(AutoSaver::spawn(
                Arc::clone(&core),
                Duration::from_secs(config.auto_save_interval_secs),
            )),
            SaveMode::OnExit => None,
        };

        tracing::info!(
            "Vocabulary engine initialized (save_mode {:?}, {} workers)",
            config.save_mode,
            config.worker_count
        );

        Ok(Self {
            core,
            recommender,
            pool: Mutex::new(Some(pool)),
            saver: Mutex::new(saver),
            save_mode: Mutex::new(config.save_mode),
            config,
        })
    }

    /// Applies one usage event and waits for the durable write.
    pub async fn apply_usage(
        &self,
        user_id: &str,
        raw_word: &str,
        kind: UsageKind,
    ) -> VocablyResult<UsageOutcome> {
        self.core.apply_usage(user_id, raw_word, kind).await
    }

    /// Dispatches one usage event to the worker pool and returns without
    /// waiting for it to apply. Per-word submission order is preserved.
    pub async fn report_usage(
        &self,
        user_id: &str,
        raw_word: &str,
        kind: UsageKind,
    ) -> VocablyResult<()> {
        // Normalize before sharding so every surface form of a word
        // lands on the same worker queue.
        let word = self.core.normalizer.normalize(raw_word.trim());
        let pool = self.pool.lock().await;
        match pool.as_ref() {
            Some(pool) => {
                pool.dispatch(UpdateJob {
                    user_id: user_id.to_string(),
                    word,
                    kind,
                })
                .await
            }
            None => Err(VocablyError::Engine(
                "Engine is finalized; no further updates accepted".to_string(),
            )),
        }
    }

    /// Applies a batch of usage events, one conversation turn's worth.
    /// Every event is attempted; a failure on one word never aborts its
    /// siblings.
    pub async fn apply_usage_batch(
        &self,
        user_id: &str,
        events: Vec<(String, UsageKind)>,
    ) -> Vec<(String, VocablyResult<UsageOutcome>)> {
        let mut results = Vec::with_capacity(events.len());
        for (word, kind) in events {
            let outcome = self.core.apply_usage(user_id, &word, kind).await;
            if let Err(e) = &outcome {
                tracing::warn!("Batch update failed for '{}': {}; continuing", word, e);
            }
            results.push((word, outcome));
        }
        results
    }

    /// Returns up to `top_n` (default from config) unmastered words most
    /// relevant to `conversation_text`.
    pub async fn recommend(
        &self,
        user_id: &str,
        conversation_text: &str,
        top_n: Option<usize>,
    ) -> VocablyResult<Vec<String>> {
        let top_n = top_n.unwrap_or(self.config.top_n_default);
        self.recommender
            .recommend(user_id, conversation_text, top_n)
            .await
    }

    /// Recommends against a full conversation turn (learner message plus
    /// assistant reply).
    pub async fn recommend_for_turn(
        &self,
        user_id: &str,
        user_input: &str,
        assistant_reply: &str,
        top_n: Option<usize>,
    ) -> VocablyResult<Vec<String>> {
        let top_n = top_n.unwrap_or(self.config.top_n_default);
        self.recommender
            .recommend_for_turn(user_id, user_input, assistant_reply, top_n)
            .await
    }

    /// Finds which of the user's tracked words occur in `text`, exact or
    /// inflected ("run" matches "running").
    pub async fn detect_used_words(&self, user_id: &str, text: &str) -> VocablyResult<Vec<UsedWord>> {
        let records = self
            .core
            .store
            .list_active(user_id, &VocabFilter::default())
            .await?;
        Ok(records
            .iter()
            .filter_map(|record| {
                vocably_lexicon::find_variant(&record.word, text).map(|variant| UsedWord {
                    word: record.word.clone(),
                    variant,
                })
            })
            .collect())
    }

    /// Aggregate mastery statistics over the user's active records.
    pub async fn stats(&self, user_id: &str) -> VocablyResult<VocabStats> {
        let records = self
            .core
            .store
            .list_active(user_id, &VocabFilter::default())
            .await?;
        let mastered = records.iter().filter(|r| r.is_mastered).count();
        Ok(VocabStats::from_counts(records.len(), mastered))
    }

    /// Lists the user's active records under a filter, for the outer
    /// vocabulary views.
    pub async fn list_vocabulary(
        &self,
        user_id: &str,
        filter: &VocabFilter,
    ) -> VocablyResult<Vec<VocabRecord>> {
        self.core.store.list_active(user_id, filter).await
    }

    /// Soft-deletes the user's entire vocabulary and drops their staged
    /// deltas. Returns how many records were deactivated.
    pub async fn deactivate_user(&self, user_id: &str) -> VocablyResult<usize> {
        let deactivated = self.core.store.deactivate_all(user_id).await?;
        self.core.staged.drop_user(user_id).await;
        tracing::info!("Deactivated {} records for user {}", deactivated, user_id);
        Ok(deactivated)
    }

    /// Flushes all staged deltas now, regardless of save mode.
    pub async fn flush_now(&self) -> FlushReport {
        self.core.flush_staged().await
    }

    /// The write-behind staging layer, for inspection.
    pub fn staged(&self) -> &WriteBehindCache {
        &self.core.staged
    }

    /// The shared word-embedding cache, for inspection.
    pub fn embedding_cache(&self) -> &EmbeddingCache {
        &self.core.embedding_cache
    }

    /// The currently active save mode.
    pub async fn save_mode(&self) -> SaveMode {
        *self.save_mode.lock().await
    }

    /// Switches between timer-driven and exit-only flushing at runtime.
    pub async fn set_save_mode(&self, mode: SaveMode, interval_secs: Option<u64>) {
        let mut saver = self.saver.lock().await;
        if let Some(running) = saver.take() {
            running.stop().await;
        }
        if mode == SaveMode::AutoSave {
            let interval = interval_secs.unwrap_or(self.config.auto_save_interval_secs);
            *saver = Some(AutoSaver::spawn(
                Arc::clone(&self.core),
                Duration::from_secs(interval),
            ));
        }
        *self.save_mode.lock().await = mode;
        tracing::info!("Save mode set to {:?}", mode);
    }

    /// Shuts the engine down: cancels the timer, drains the worker pool,
    /// and flushes every remaining staged delta.
    ///
    /// The pool drains before the final flush so deltas staged by
    /// in-flight updates are not stranded.
    pub async fn finalize(&self) {
        tracing::info!("Finalizing vocabulary engine");
        if let Some(saver) = self.saver.lock().await.take() {
            saver.stop().await;
        }
        if let Some(pool) = self.pool.lock().await.take() {
            pool.shutdown().await;
        }
        let report = self.core.flush_staged().await;
        if report.flushed > 0 || report.retried > 0 {
            tracing::info!(
                "Final flush wrote {} deltas ({} still pending)",
                report.flushed,
                report.retried
            );
        }
    }
}
