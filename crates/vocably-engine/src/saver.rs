use crate::engine::EngineCore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Recurring auto-save task flushing staged deltas.
///
/// A single loop owns the timer, so one tick's flush can never overlap
/// the next; stopping the saver guarantees no further ticks fire.
pub(crate) struct AutoSaver {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl AutoSaver {
    pub fn spawn(core: Arc<EngineCore>, interval: Duration) -> Self {
        let (shutdown, mut rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval fires immediately once; the first flush should
            // wait a full period.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = core.flush_staged().await;
                        if report.flushed > 0 || report.retried > 0 {
                            tracing::info!(
                                "Auto-save flushed {} deltas ({} retried)",
                                report.flushed,
                                report.retried
                            );
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
            tracing::debug!("Auto-save timer stopped");
        });
        Self { shutdown, handle }
    }

    /// Cancels the timer and waits for the loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!("Auto-save task ended abnormally: {e}");
        }
    }
}
