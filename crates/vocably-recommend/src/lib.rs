//! Semantic vocabulary recommendation for the Vocably learning engine.
//!
//! Ranks a user's unmastered vocabulary against live conversation text by
//! cosine similarity of embedding vectors, caching per-word embeddings
//! for the life of the process and degrading to recency ordering when
//! the embedding capability is unavailable.
//!
//! # Main types
//!
//! - [`Recommender`] — Ranks unmastered words against conversation text.
//! - [`EmbeddingProvider`] — Trait for text-to-vector embedding.
//! - [`HashedEmbedding`] — Deterministic local provider, no model needed.
//! - [`EmbeddingCache`] — Process-lifetime word-to-vector cache.

/// Word-embedding cache.
pub mod cache;
/// Embedding provider trait and local implementation.
pub mod embedding;
/// Similarity ranking over unmastered vocabulary.
pub mod recommend;

pub use cache::EmbeddingCache;
pub use embedding::{cosine_similarity, EmbeddingProvider, HashedEmbedding};
pub use recommend::Recommender;
