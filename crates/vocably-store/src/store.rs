use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use vocably_core::{Source, VocabRecord, VocablyError, VocablyResult};

/// Optional constraints when listing a user's active records.
#[derive(Debug, Clone, Default)]
pub struct VocabFilter {
    /// Keep only records with this mastery status.
    pub is_mastered: Option<bool>,
    /// Keep only records with this level tag.
    pub level: Option<String>,
    /// Keep only records with this provenance.
    pub source: Option<Source>,
    /// Truncate the result to this many records.
    pub limit: Option<usize>,
}

impl VocabFilter {
    /// A filter selecting only unmastered records.
    pub fn unmastered() -> Self {
        Self {
            is_mastered: Some(false),
            ..Self::default()
        }
    }

    fn matches(&self, record: &VocabRecord) -> bool {
        if let Some(mastered) = self.is_mastered {
            if record.is_mastered != mastered {
                return false;
            }
        }
        if let Some(level) = &self.level {
            if &record.level != level {
                return false;
            }
        }
        if let Some(source) = self.source {
            if record.source != source {
                return false;
            }
        }
        true
    }
}

/// Trait for the durable vocabulary record store.
///
/// The store's own concurrency control (row locking, versioning) is the
/// implementor's responsibility; the engine only assumes these operations
/// are individually atomic.
#[async_trait]
pub trait VocabStore: Send + Sync {
    /// Finds the active record for `(user_id, word)`, if any.
    async fn find_active(&self, user_id: &str, word: &str) -> VocablyResult<Option<VocabRecord>>;

    /// Inserts the record, or replaces the active record sharing its
    /// `(user_id, word)` key (or its id).
    async fn upsert(&self, record: VocabRecord) -> VocablyResult<()>;

    /// Lists the user's active records matching `filter`, in stable
    /// insertion order.
    async fn list_active(
        &self,
        user_id: &str,
        filter: &VocabFilter,
    ) -> VocablyResult<Vec<VocabRecord>>;

    /// Lists the user's active, not-yet-mastered records.
    async fn list_active_unmastered(&self, user_id: &str) -> VocablyResult<Vec<VocabRecord>> {
        self.list_active(user_id, &VocabFilter::unmastered()).await
    }

    /// Soft-deletes every active record of the user. Returns how many
    /// records were deactivated.
    async fn deactivate_all(&self, user_id: &str) -> VocablyResult<usize>;
}

/// In-memory store over a record vector. Iteration order is insertion
/// order, which gives the recommender its stable tie-break.
pub struct InMemoryVocabStore {
    records: RwLock<Vec<VocabRecord>>,
}

impl InMemoryVocabStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the matching record in place, or appends. Returns true
    /// when an existing record was replaced.
    async fn apply_upsert(&self, record: VocabRecord) -> bool {
        let mut records = self.records.write().await;
        let position = records.iter().position(|r| {
            r.id == record.id
                || (r.is_active
                    && record.is_active
                    && r.user_id == record.user_id
                    && r.word == record.word)
        });
        match position {
            Some(i) => {
                records[i] = record;
                true
            }
            None => {
                records.push(record);
                false
            }
        }
    }
}

impl Default for InMemoryVocabStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VocabStore for InMemoryVocabStore {
    async fn find_active(&self, user_id: &str, word: &str) -> VocablyResult<Option<VocabRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.is_active && r.user_id == user_id && r.word == word)
            .cloned())
    }

    async fn upsert(&self, record: VocabRecord) -> VocablyResult<()> {
        self.apply_upsert(record).await;
        Ok(())
    }

    async fn list_active(
        &self,
        user_id: &str,
        filter: &VocabFilter,
    ) -> VocablyResult<Vec<VocabRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<VocabRecord> = records
            .iter()
            .filter(|r| r.is_active && r.user_id == user_id && filter.matches(r))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn deactivate_all(&self, user_id: &str) -> VocablyResult<usize> {
        let mut records = self.records.write().await;
        let mut deactivated = 0;
        for record in records.iter_mut() {
            if record.is_active && record.user_id == user_id {
                record.is_active = false;
                deactivated += 1;
            }
        }
        Ok(deactivated)
    }
}

/// File-backed store persisting records as JSONL. Loads everything into
/// memory on creation; appends new records, rewrites the file on update
/// or deactivation. Sized for personal vocabulary sets, not bulk corpora.
pub struct FileVocabStore {
    path: PathBuf,
    inner: InMemoryVocabStore,
}

impl FileVocabStore {
    /// Opens the store at `path`, loading existing records if the file
    /// is present.
    pub async fn new(path: PathBuf) -> VocablyResult<Self> {
        let inner = InMemoryVocabStore::new();

        if path.exists() {
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| VocablyError::Store(format!("Failed to read vocab store: {e}")))?;
            let mut loaded = 0usize;
            for line in data.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let record: VocabRecord = serde_json::from_str(line)
                    .map_err(|e| VocablyError::Store(format!("Invalid JSONL record: {e}")))?;
                inner.apply_upsert(record).await;
                loaded += 1;
            }
            tracing::info!("Loaded {} vocab records from {}", loaded, path.display());
        } else if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VocablyError::Store(format!("Failed to create dir: {e}")))?;
        }

        Ok(Self { path, inner })
    }

    async fn append_record(&self, record: &VocabRecord) -> VocablyResult<()> {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| VocablyError::Store(format!("Failed to open vocab store: {e}")))?;
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| VocablyError::Store(format!("Failed to write record: {e}")))?;
        Ok(())
    }

    async fn rewrite_file(&self) -> VocablyResult<()> {
        let records = self.inner.records.read().await;
        let mut data = String::new();
        for record in records.iter() {
            data.push_str(&serde_json::to_string(record)?);
            data.push('\n');
        }
        drop(records);
        tokio::fs::write(&self.path, data.as_bytes())
            .await
            .map_err(|e| VocablyError::Store(format!("Failed to write vocab store: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl VocabStore for FileVocabStore {
    async fn find_active(&self, user_id: &str, word: &str) -> VocablyResult<Option<VocabRecord>> {
        self.inner.find_active(user_id, word).await
    }

    async fn upsert(&self, record: VocabRecord) -> VocablyResult<()> {
        let replaced = self.inner.apply_upsert(record.clone()).await;
        if replaced {
            self.rewrite_file().await
        } else {
            self.append_record(&record).await
        }
    }

    async fn list_active(
        &self,
        user_id: &str,
        filter: &VocabFilter,
    ) -> VocablyResult<Vec<VocabRecord>> {
        self.inner.list_active(user_id, filter).await
    }

    async fn deactivate_all(&self, user_id: &str) -> VocablyResult<usize> {
        let deactivated = self.inner.deactivate_all(user_id).await?;
        if deactivated > 0 {
            self.rewrite_file().await?;
        }
        Ok(deactivated)
    }
}
