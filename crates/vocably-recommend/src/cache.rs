use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-lifetime cache of canonical word → embedding vector.
///
/// No eviction policy: personal vocabulary sets stay small, and the
/// embedding of a fixed canonical string never changes. The usage engine
/// still evicts a word's entry whenever its record is updated, so a
/// canonicalization change is picked up on the next ranking.
///
/// Owned and injected at engine construction so separate engine
/// instances (and tests) never share state.
pub struct EmbeddingCache {
    entries: Mutex<HashMap<String, Vec<f32>>>,
}

impl EmbeddingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached vector for `word`, if present.
    pub fn get(&self, word: &str) -> Option<Vec<f32>> {
        self.entries.lock().get(word).cloned()
    }

    /// Caches the vector for `word`, replacing any previous entry.
    pub fn insert(&self, word: &str, vector: Vec<f32>) {
        self.entries.lock().insert(word.to_string(), vector);
    }

    /// Drops the entry for `word`. Returns whether one was present.
    pub fn evict(&self, word: &str) -> bool {
        self.entries.lock().remove(word).is_some()
    }

    /// Number of cached words.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_evict() {
        let cache = EmbeddingCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("cat").is_none());

        cache.insert("cat", vec![0.1, 0.2]);
        assert_eq!(cache.get("cat"), Some(vec![0.1, 0.2]));
        assert_eq!(cache.len(), 1);

        assert!(cache.evict("cat"));
        assert!(!cache.evict("cat"));
        assert!(cache.get("cat").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = EmbeddingCache::new();
        cache.insert("cat", vec![1.0]);
        cache.insert("cat", vec![2.0]);
        assert_eq!(cache.get("cat"), Some(vec![2.0]));
        assert_eq!(cache.len(), 1);
    }
}
