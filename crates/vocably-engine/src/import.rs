use crate::engine::VocabEngine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vocably_core::{Source, VocabRecord, VocablyResult};
use vocably_lexicon::has_cjk;

/// One pre-existing vocabulary entry to import, e.g. from a device the
/// learner is migrating off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabImport {
    /// Surface word form; normalized on import.
    pub word: String,
    /// Curriculum level tag, if known.
    #[serde(default)]
    pub level: Option<String>,
    /// How the word originally entered tracking.
    pub source: Source,
    /// Correct-use count carried over.
    #[serde(default)]
    pub right_use_count: u32,
    /// Wrong-use count carried over.
    #[serde(default)]
    pub wrong_use_count: u32,
    /// Original creation time, if known.
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    /// Last usage time, if known.
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl VocabEngine {
    /// Imports pre-existing records for a user.
    ///
    /// Words are normalized; CJK words, empty words, and duplicates of
    /// active records are skipped; derived mastery fields are recomputed
    /// from the imported counters. A failure on one item never aborts
    /// the rest. Returns how many records were imported.
    pub async fn bulk_import(
        &self,
        user_id: &str,
        items: Vec<VocabImport>,
    ) -> VocablyResult<usize> {
        let threshold = self.core.mastery_threshold;
        let mut imported = 0;

        for item in items {
            let trimmed = item.word.trim();
            if trimmed.is_empty() || has_cjk(trimmed) {
                tracing::debug!("Skipping unimportable word: '{}'", item.word);
                continue;
            }
            let word = self.core.normalizer.normalize(trimmed);

            match self.core.store.find_active(user_id, &word).await {
                Ok(Some(_)) => {
                    tracing::debug!("Skipping duplicate import: '{}'", word);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Import lookup failed for '{}': {}; continuing", word, e);
                    continue;
                }
            }

            let mut record = VocabRecord::new(user_id, &word, item.source, threshold);
            record.right_use_count = item.right_use_count;
            record.wrong_use_count = item.wrong_use_count;
            if let Some(level) = item.level {
                record.level = level;
            }
            if let Some(added_at) = item.added_at {
                record.added_at = added_at;
            }
            if let Some(last_used_at) = item.last_used_at {
                record.last_used_at = last_used_at;
            }
            record.recompute_mastery(threshold);

            match self.core.store.upsert(record).await {
                Ok(()) => imported += 1,
                Err(e) => {
                    tracing::warn!("Import write failed for '{}': {}; continuing", word, e);
                }
            }
        }

        tracing::info!("Imported {} vocabulary records for user {}", imported, user_id);
        Ok(imported)
    }
}
