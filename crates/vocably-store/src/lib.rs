//! Durable vocabulary record storage for the Vocably learning engine.
//!
//! The real deployment owns its relational store; this crate defines the
//! narrow contract the engine needs from it, plus an in-memory
//! implementation for tests and a JSONL file-backed implementation for
//! single-process deployments.
//!
//! # Main types
//!
//! - [`VocabStore`] — Trait for reading and upserting vocabulary records.
//! - [`VocabFilter`] — Optional constraints for listing a user's records.
//! - [`InMemoryVocabStore`] — Process-local store, suitable for tests.
//! - [`FileVocabStore`] — JSONL-on-disk store that reloads on startup.

/// Store trait and reference implementations.
pub mod store;

pub use store::{FileVocabStore, InMemoryVocabStore, VocabFilter, VocabStore};
