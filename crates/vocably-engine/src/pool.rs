use crate::engine::EngineCore;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vocably_core::{UsageKind, VocablyError, VocablyResult};

const QUEUE_DEPTH: usize = 256;

pub(crate) struct UpdateJob {
    pub user_id: String,
    pub word: String,
    pub kind: UsageKind,
}

/// Fixed pool of update workers, one queue per worker.
///
/// Jobs shard by `(user_id, word)` hash, so updates to the same key are
/// applied in submission order; updates to different keys have no
/// relative ordering.
pub(crate) struct UpdatePool {
    senders: Vec<mpsc::Sender<UpdateJob>>,
    handles: Vec<JoinHandle<()>>,
}

impl UpdatePool {
    pub fn spawn(worker_count: usize, core: Arc<EngineCore>) -> Self {
        let mut senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let (tx, mut rx) = mpsc::channel::<UpdateJob>(QUEUE_DEPTH);
            let core = Arc::clone(&core);
            let handle = tokio::spawn(async move {
                while let Some(job) = rx.recv().await {
                    core.run_update(&job.user_id, &job.word, job.kind).await;
                }
                tracing::debug!("Update worker {} drained", worker);
            });
            senders.push(tx);
            handles.push(handle);
        }
        Self { senders, handles }
    }

    /// Enqueues a job on its key's shard. Returns once the job is
    /// queued, not once it is applied.
    pub async fn dispatch(&self, job: UpdateJob) -> VocablyResult<()> {
        let mut hasher = DefaultHasher::new();
        job.user_id.hash(&mut hasher);
        job.word.hash(&mut hasher);
        let shard = (hasher.finish() as usize) % self.senders.len();
        self.senders[shard]
            .send(job)
            .await
            .map_err(|_| VocablyError::Engine("Update pool is shut down".to_string()))
    }

    /// Closes the queues and waits for in-flight jobs to finish.
    pub async fn shutdown(self) {
        drop(self.senders);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!("Update worker ended abnormally: {e}");
            }
        }
    }
}
