use async_trait::async_trait;
use vocably_core::{VocablyError, VocablyResult};

/// Trait for computing text embeddings (vector representations).
///
/// The engine assumes a fixed dimensionality per deployment and nothing
/// else; a sentence-transformer service, an API call, or the local
/// hashed provider all fit behind this trait.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Computes the embedding vector for a single text.
    async fn embed(&self, text: &str) -> VocablyResult<Vec<f32>>;

    /// Dimension of the vectors produced by this provider.
    fn dimension(&self) -> usize;
}

/// Deterministic hashed bag-of-words embedding.
///
/// Each token lands on two hash positions of a fixed-length vector,
/// weighted by occurrence count; the result is L2-normalized. Shared
/// tokens produce high cosine similarity, which is enough for ranking a
/// personal vocabulary against short conversation turns without any
/// model download.
pub struct HashedEmbedding {
    dimension: usize,
}

impl HashedEmbedding {
    /// Creates a provider emitting vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn tokens(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 1)
            .map(str::to_string)
            .collect()
    }
}

impl Default for HashedEmbedding {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbedding {
    async fn embed(&self, text: &str) -> VocablyResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(VocablyError::Recommend(
                "Cannot embed empty text".to_string(),
            ));
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in Self::tokens(text) {
            let primary = fnv1a(token.as_bytes());
            let secondary = fnv1a_seeded(token.as_bytes(), 0x9E37);
            vector[primary as usize % self.dimension] += 1.0;
            vector[secondary as usize % self.dimension] += 0.6;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity of two vectors: normalized dot product, 0.0 for
/// mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// FNV-1a over the input bytes.
fn fnv1a(data: &[u8]) -> u32 {
    fnv1a_seeded(data, 0)
}

fn fnv1a_seeded(data: &[u8], seed: u32) -> u32 {
    let mut hash: u32 = 2166136261 ^ seed;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimension_and_length() {
        let embedder = HashedEmbedding::new(128);
        assert_eq!(embedder.dimension(), 128);
        let vector = embedder.embed("hello world").await.unwrap();
        assert_eq!(vector.len(), 128);
    }

    #[tokio::test]
    async fn test_unit_norm() {
        let embedder = HashedEmbedding::default();
        let vector = embedder.embed("the quick brown fox").await.unwrap();
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashedEmbedding::default();
        let first = embedder.embed("vocabulary practice").await.unwrap();
        let second = embedder.embed("vocabulary practice").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shared_tokens_rank_closer() {
        let embedder = HashedEmbedding::default();
        let context = embedder.embed("I love walking my dog").await.unwrap();
        let dog = embedder.embed("dog").await.unwrap();
        let book = embedder.embed("book").await.unwrap();
        assert!(cosine_similarity(&dog, &context) > cosine_similarity(&book, &context));
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let embedder = HashedEmbedding::default();
        assert!(embedder.embed("").await.is_err());
        assert!(embedder.embed("   ").await.is_err());
    }

    #[test]
    fn test_cosine_extremes() {
        let v = vec![1.0, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&v, &[0.0, 1.0]).abs() < 0.001);
        assert!((cosine_similarity(&v, &[-1.0, 0.0]) + 1.0).abs() < 0.001);
        assert_eq!(cosine_similarity(&v, &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&v, &[0.0, 0.0]), 0.0);
    }
}
