//! Core types and error definitions for the Vocably learning engine.
//!
//! This crate provides the foundational types shared across all Vocably
//! crates: error handling, the vocabulary record model, usage event
//! kinds, and the engine configuration surface.
//!
//! # Main types
//!
//! - [`VocablyError`] — Unified error enum for all Vocably subsystems.
//! - [`VocablyResult`] — Convenience alias for `Result<T, VocablyError>`.
//! - [`VocabRecord`] — One tracked word for one user, with usage counters.
//! - [`UsageKind`] — The kind of usage event being reported.
//! - [`Source`] — Provenance tag recorded when a word first enters tracking.
//! - [`EngineConfig`] — TOML-loadable engine configuration.

/// Engine configuration surface and save-mode selection.
pub mod config;
/// Vocabulary record model and usage event types.
pub mod record;

pub use config::{EngineConfig, SaveMode};
pub use record::{RejectReason, Source, UsageKind, UsageOutcome, VocabRecord, VocabStats};

/// Top-level error type for the Vocably engine.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum VocablyError {
    /// An error from the lexical normalizer.
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// An error from the durable vocabulary record store.
    #[error("Store error: {0}")]
    Store(String),

    /// An error from the usage update engine or write-back cache.
    #[error("Engine error: {0}")]
    Engine(String),

    /// An error from the embedding provider or recommender.
    #[error("Recommend error: {0}")]
    Recommend(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`VocablyError`].
pub type VocablyResult<T> = Result<T, VocablyError>;
