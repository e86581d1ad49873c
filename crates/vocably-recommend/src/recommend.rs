use crate::cache::EmbeddingCache;
use crate::embedding::{cosine_similarity, EmbeddingProvider};
use std::sync::Arc;
use vocably_core::{VocabRecord, VocablyResult};
use vocably_store::VocabStore;

/// Ranks a user's unmastered vocabulary against conversation text.
///
/// Embedding runs on the caller's task; callers on a cooperative event
/// loop should dispatch to a worker if their provider blocks.
pub struct Recommender {
    store: Arc<dyn VocabStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Arc<EmbeddingCache>,
}

impl Recommender {
    /// Builds a recommender over the store, embedding provider, and
    /// shared word-embedding cache.
    pub fn new(
        store: Arc<dyn VocabStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        cache: Arc<EmbeddingCache>,
    ) -> Self {
        Self {
            store,
            embedder,
            cache,
        }
    }

    /// Returns up to `top_n` unmastered words most similar to
    /// `conversation_text`, highest similarity first. Ties keep the
    /// store's iteration order.
    ///
    /// An unavailable embedding capability degrades to the least
    /// recently used words instead of failing the request.
    pub async fn recommend(
        &self,
        user_id: &str,
        conversation_text: &str,
        top_n: usize,
    ) -> VocablyResult<Vec<String>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.store.list_active_unmastered(user_id).await?;
        if candidates.is_empty() {
            tracing::debug!("No unmastered vocabulary for user {}", user_id);
            return Ok(Vec::new());
        }

        let context = match self.embedder.embed(conversation_text).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(
                    "Embedding unavailable ({}), falling back to recency ordering",
                    e
                );
                return Ok(Self::fallback_by_recency(candidates, top_n));
            }
        };

        let mut scored: Vec<(String, f32)> = Vec::with_capacity(candidates.len());
        for record in &candidates {
            let vector = match self.word_embedding(&record.word).await {
                Some(vector) => vector,
                None => continue,
            };
            scored.push((record.word.clone(), cosine_similarity(&vector, &context)));
        }

        // Stable sort keeps candidate order on ties.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        tracing::debug!(
            "Recommending {} of {} unmastered words for user {}",
            scored.len(),
            candidates.len(),
            user_id
        );
        Ok(scored.into_iter().map(|(word, _)| word).collect())
    }

    /// Convenience over [`Self::recommend`] for a full conversation
    /// turn: the learner's message and the assistant's reply, joined.
    pub async fn recommend_for_turn(
        &self,
        user_id: &str,
        user_input: &str,
        assistant_reply: &str,
        top_n: usize,
    ) -> VocablyResult<Vec<String>> {
        let turn = format!("{user_input} {assistant_reply}");
        self.recommend(user_id, &turn, top_n).await
    }

    async fn word_embedding(&self, word: &str) -> Option<Vec<f32>> {
        if let Some(cached) = self.cache.get(word) {
            return Some(cached);
        }
        match self.embedder.embed(word).await {
            Ok(vector) => {
                self.cache.insert(word, vector.clone());
                Some(vector)
            }
            Err(e) => {
                tracing::warn!("Failed to embed word '{}': {}", word, e);
                None
            }
        }
    }

    fn fallback_by_recency(mut candidates: Vec<VocabRecord>, top_n: usize) -> Vec<String> {
        candidates.sort_by_key(|r| r.last_used_at);
        candidates
            .into_iter()
            .take(top_n)
            .map(|r| r.word)
            .collect()
    }
}
