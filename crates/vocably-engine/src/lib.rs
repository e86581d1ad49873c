//! Usage tracking engine for the Vocably vocabulary learner.
//!
//! Applies usage events (right use, wrong use, lookup, manual add) to
//! per-user vocabulary records, maintaining the mastery invariant
//! `is_mastered == (right_use_count - wrong_use_count >= threshold)`,
//! staging deltas in a deferred write-back cache, and dispatching
//! updates on a small sharded worker pool so callers never block on
//! persistence.
//!
//! # Main types
//!
//! - [`VocabEngine`] — The facade: usage reporting, recommendations,
//!   bulk import, statistics, finalization.
//! - [`WriteBehindCache`] — Per-user staged usage deltas awaiting flush.
//! - [`CorrectionReview`] — Structured grammar-correction outcome
//!   consumed to derive wrong-use and right-use events.

/// Deferred write-back staging of usage deltas.
pub mod cache;
/// Correction-driven usage reporting.
pub mod correction;
/// The usage update engine facade.
pub mod engine;
/// Bulk import of pre-existing vocabulary.
pub mod import;
/// Sharded update worker pool.
pub mod pool;
/// Auto-save flush timer.
pub mod saver;

pub use cache::{FlushReport, StagedDelta, WriteBehindCache};
pub use correction::{correction_confidence, CorrectionKind, CorrectionReview, CorrectionSummary, WordFlag};
pub use engine::{UsedWord, VocabEngine};
pub use import::VocabImport;
