use crate::engine::VocabEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vocably_core::{UsageKind, UsageOutcome, VocablyResult};
use vocably_lexicon::{extract_words, has_cjk};

/// The kind of error a grammar correction flagged on a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    /// The learner translated literally from their first language.
    Translation,
    /// The wrong word was chosen.
    Vocabulary,
    /// A grammatical slip (not worth tracking as vocabulary).
    Grammar,
    /// An unidiomatic word pairing.
    Collocation,
}

impl CorrectionKind {
    /// Confidence weight of this error kind; clearer error classes give
    /// the corrector more certainty.
    fn weight(self) -> f32 {
        match self {
            Self::Translation => 0.9,
            Self::Vocabulary => 0.8,
            Self::Grammar => 0.7,
            Self::Collocation => 0.6,
        }
    }

    /// Only genuine word-choice errors become tracked vocabulary.
    fn worth_tracking(self) -> bool {
        matches!(self, Self::Translation | Self::Vocabulary)
    }
}

/// One flagged word pair inside a correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFlag {
    /// What the learner wrote.
    pub original: String,
    /// What it should have been.
    pub corrected: String,
    /// The error class.
    pub kind: CorrectionKind,
}

/// A grammar-correction outcome, normalized into a structured type at
/// the boundary. The upstream corrector's loose payloads never reach
/// the engine directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionReview {
    /// Whether the corrector considered its own output valid.
    pub is_valid: bool,
    /// The fully corrected input, absent when nothing needed fixing.
    pub corrected_input: Option<String>,
    /// Word-level flags raised by the corrector.
    pub flags: Vec<WordFlag>,
}

/// What a correction pass reported into the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionSummary {
    /// Words reported as wrong uses.
    pub wrong_reported: usize,
    /// Words reported as right uses.
    pub right_reported: usize,
    /// Confidence in the correction itself, in [0, 1].
    pub confidence: f32,
}

/// Confidence in a correction from its flagged error kinds: starts at
/// certainty and drops as errors accumulate, floored at 0.3.
pub fn correction_confidence(flags: &[WordFlag]) -> f32 {
    if flags.is_empty() {
        return 1.0;
    }
    let total: f32 = flags.iter().map(|f| f.kind.weight()).sum();
    (1.0 - total * 0.1).clamp(0.3, 1.0)
}

impl VocabEngine {
    /// Derives usage events from a grammar-correction outcome.
    ///
    /// Flagged translation/vocabulary errors become wrong-use events for
    /// the corrected word (single non-CJK words longer than two chars
    /// only); meaningful words common to the learner's input and the
    /// corrected text — or all of them, when the input was already
    /// correct — become right-use events.
    pub async fn apply_correction(
        &self,
        user_id: &str,
        review: &CorrectionReview,
        user_input: &str,
    ) -> VocablyResult<CorrectionSummary> {
        if !review.is_valid {
            tracing::debug!("Correction not valid, skipping vocabulary update");
            return Ok(CorrectionSummary {
                wrong_reported: 0,
                right_reported: 0,
                confidence: correction_confidence(&review.flags),
            });
        }

        let mut wrong_reported = 0;
        for flag in &review.flags {
            if flag.original.is_empty()
                || flag.corrected.is_empty()
                || flag.original == flag.corrected
            {
                continue;
            }
            if !flag.kind.worth_tracking() {
                continue;
            }
            let corrected = flag.corrected.trim();
            if has_cjk(corrected)
                || corrected.split_whitespace().count() != 1
                || corrected.len() <= 2
            {
                continue;
            }
            match self
                .apply_usage(user_id, corrected, UsageKind::WrongUse)
                .await
            {
                Ok(UsageOutcome::Rejected(_)) => {}
                Ok(_) => wrong_reported += 1,
                Err(e) => {
                    tracing::warn!("Correction update failed for '{}': {}", corrected, e);
                }
            }
        }

        let correct_words: BTreeSet<String> = match &review.corrected_input {
            Some(corrected_input) => {
                let original_words = extract_words(user_input);
                let corrected_words = extract_words(corrected_input);
                original_words
                    .intersection(&corrected_words)
                    .cloned()
                    .collect()
            }
            None if review.flags.is_empty() && !has_cjk(user_input) => extract_words(user_input),
            None => BTreeSet::new(),
        };

        let mut right_reported = 0;
        for word in correct_words {
            match self.apply_usage(user_id, &word, UsageKind::RightUse).await {
                Ok(UsageOutcome::Rejected(_)) => {}
                Ok(_) => right_reported += 1,
                Err(e) => {
                    tracing::warn!("Right-use update failed for '{}': {}", word, e);
                }
            }
        }

        Ok(CorrectionSummary {
            wrong_reported,
            right_reported,
            confidence: correction_confidence(&review.flags),
        })
    }
}
