use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of usage event being reported for a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    /// The learner used the word correctly in conversation.
    RightUse,
    /// The learner used the word incorrectly (flagged by correction).
    WrongUse,
    /// The learner looked the word up in the dictionary.
    Lookup,
    /// The learner added the word manually.
    UserInput,
}

impl UsageKind {
    /// Whether this event increments the wrong-use counter.
    ///
    /// Lookups and manual additions count as "not yet correct" encounters,
    /// same as flagged wrong uses.
    pub fn counts_as_wrong(self) -> bool {
        matches!(self, Self::WrongUse | Self::Lookup | Self::UserInput)
    }
}

/// Provenance tag recorded when a word first enters tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Seeded from a curriculum vocabulary list.
    LevelVocab,
    /// First seen via a dictionary lookup.
    Lookup,
    /// First seen as an incorrect use.
    WrongUse,
    /// Recorded as a correct use (never creates a record).
    RightUse,
    /// Added manually by the learner.
    UserInput,
}

impl From<UsageKind> for Source {
    fn from(kind: UsageKind) -> Self {
        match kind {
            UsageKind::RightUse => Source::RightUse,
            UsageKind::WrongUse => Source::WrongUse,
            UsageKind::Lookup => Source::Lookup,
            UsageKind::UserInput => Source::UserInput,
        }
    }
}

/// One tracked vocabulary word for one user.
///
/// `(user_id, word)` is unique among active records. The derived fields
/// `mastery_score` and `is_mastered` are always recomputed from the
/// counters in the same unit of work that changes them; the counters are
/// the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabRecord {
    /// Storage identity (not part of the uniqueness contract).
    pub id: Uuid,
    /// Opaque user identifier owned by the external user system.
    pub user_id: String,
    /// Canonical (normalized, lower-cased) word form used as the key.
    pub word: String,
    /// How the word first entered tracking.
    pub source: Source,
    /// Optional curriculum level tag, `"none"` when absent.
    #[serde(default = "default_level")]
    pub level: String,
    /// Number of correct uses observed.
    pub right_use_count: u32,
    /// Number of wrong uses, lookups, and manual additions observed.
    pub wrong_use_count: u32,
    /// Derived: `right_use_count - wrong_use_count`.
    pub mastery_score: i32,
    /// Derived: `mastery_score >= mastery_threshold`.
    pub is_mastered: bool,
    /// When the record was created.
    pub added_at: DateTime<Utc>,
    /// When a usage event last touched the record.
    pub last_used_at: DateTime<Utc>,
    /// Soft-delete flag; inactive records are excluded from all queries.
    pub is_active: bool,
}

fn default_level() -> String {
    "none".to_string()
}

impl VocabRecord {
    /// Creates a fresh record for a word entering tracking now.
    ///
    /// The initial counters follow the creation rule: any creating event
    /// counts as one wrong use (a word is tracked precisely because the
    /// learner does not command it yet).
    pub fn new(
        user_id: impl Into<String>,
        word: impl Into<String>,
        source: Source,
        mastery_threshold: i32,
    ) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            word: word.into(),
            source,
            level: default_level(),
            right_use_count: 0,
            wrong_use_count: 1,
            mastery_score: 0,
            is_mastered: false,
            added_at: now,
            last_used_at: now,
            is_active: true,
        };
        record.recompute_mastery(mastery_threshold);
        record
    }

    /// Recomputes the derived `mastery_score` and `is_mastered` fields
    /// from the counters. The repair path for inconsistent records.
    pub fn recompute_mastery(&mut self, mastery_threshold: i32) {
        self.mastery_score = self.right_use_count as i32 - self.wrong_use_count as i32;
        self.is_mastered = self.mastery_score >= mastery_threshold;
    }

    /// Whether the stored derived fields agree with the counters.
    pub fn derived_fields_consistent(&self, mastery_threshold: i32) -> bool {
        let score = self.right_use_count as i32 - self.wrong_use_count as i32;
        self.mastery_score == score && self.is_mastered == (score >= mastery_threshold)
    }
}

/// Why a usage event was rejected rather than applied.
///
/// A rejection is a defined negative result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The word was empty or whitespace-only.
    EmptyWord,
    /// The word contained CJK characters; non-English tokens are not tracked.
    NonEnglish,
    /// A `right_use` event arrived for a word with no active record.
    UntrackedRightUse,
}

/// The result of applying a single usage event.
#[derive(Debug, Clone)]
pub enum UsageOutcome {
    /// An existing record was updated.
    Updated(VocabRecord),
    /// A new record was created.
    Created(VocabRecord),
    /// The event was rejected; the store is unchanged.
    Rejected(RejectReason),
}

impl UsageOutcome {
    /// The record touched by this outcome, if any.
    pub fn record(&self) -> Option<&VocabRecord> {
        match self {
            Self::Updated(r) | Self::Created(r) => Some(r),
            Self::Rejected(_) => None,
        }
    }
}

/// Aggregate vocabulary statistics for one user's active records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabStats {
    /// Total active records.
    pub total: usize,
    /// Active records currently mastered.
    pub mastered: usize,
    /// Active records still being learned.
    pub learning: usize,
    /// Mastered share of the total, in percent.
    pub mastery_rate: f32,
}

impl VocabStats {
    /// Builds stats from mastered/total counts.
    pub fn from_counts(total: usize, mastered: usize) -> Self {
        let mastery_rate = if total > 0 {
            mastered as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            mastered,
            learning: total - mastered,
            mastery_rate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_counts() {
        let record = VocabRecord::new("u1", "cat", Source::Lookup, 3);
        assert_eq!(record.wrong_use_count, 1);
        assert_eq!(record.right_use_count, 0);
        assert_eq!(record.mastery_score, -1);
        assert!(!record.is_mastered);
        assert!(record.is_active);
        assert_eq!(record.level, "none");
    }

    #[test]
    fn test_recompute_mastery_threshold() {
        let mut record = VocabRecord::new("u1", "cat", Source::WrongUse, 3);
        record.right_use_count = 4;
        record.wrong_use_count = 1;
        record.recompute_mastery(3);
        assert_eq!(record.mastery_score, 3);
        assert!(record.is_mastered);

        record.wrong_use_count = 2;
        record.recompute_mastery(3);
        assert_eq!(record.mastery_score, 2);
        assert!(!record.is_mastered);
    }

    #[test]
    fn test_derived_fields_consistency_check() {
        let mut record = VocabRecord::new("u1", "cat", Source::Lookup, 3);
        assert!(record.derived_fields_consistent(3));

        // Simulate a corrupted stored flag.
        record.is_mastered = true;
        assert!(!record.derived_fields_consistent(3));

        record.recompute_mastery(3);
        assert!(record.derived_fields_consistent(3));
    }

    #[test]
    fn test_usage_kind_wrong_counter() {
        assert!(UsageKind::WrongUse.counts_as_wrong());
        assert!(UsageKind::Lookup.counts_as_wrong());
        assert!(UsageKind::UserInput.counts_as_wrong());
        assert!(!UsageKind::RightUse.counts_as_wrong());
    }

    #[test]
    fn test_source_serde_snake_case() {
        let json = serde_json::to_string(&Source::LevelVocab).unwrap();
        assert_eq!(json, "\"level_vocab\"");
        let back: Source = serde_json::from_str("\"wrong_use\"").unwrap();
        assert_eq!(back, Source::WrongUse);
    }

    #[test]
    fn test_stats_rates() {
        let stats = VocabStats::from_counts(10, 4);
        assert_eq!(stats.learning, 6);
        assert!((stats.mastery_rate - 40.0).abs() < f32::EPSILON);

        let empty = VocabStats::from_counts(0, 0);
        assert_eq!(empty.mastery_rate, 0.0);
    }
}
