use crate::{VocablyError, VocablyResult};
use serde::{Deserialize, Serialize};

/// When staged usage deltas are written back to the durable store.
///
/// The two modes are mutually exclusive and switchable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Staged deltas drain only when the engine is finalized.
    OnExit,
    /// A recurring timer flushes users with unsaved deltas.
    AutoSave,
}

/// Engine configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Write-back mode for staged deltas.
    #[serde(default = "default_save_mode")]
    pub save_mode: SaveMode,
    /// Interval between auto-save flush ticks, in seconds.
    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval_secs: u64,
    /// Minimum `right_use_count - wrong_use_count` for mastery.
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: i32,
    /// Default number of recommendations returned.
    #[serde(default = "default_top_n")]
    pub top_n_default: usize,
    /// Number of update workers in the dispatch pool.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Bound on a single update's store interaction, in seconds.
    #[serde(default = "default_update_timeout")]
    pub update_timeout_secs: u64,
}

fn default_save_mode() -> SaveMode {
    SaveMode::OnExit
}

fn default_auto_save_interval() -> u64 {
    30
}

fn default_mastery_threshold() -> i32 {
    3
}

fn default_top_n() -> usize {
    5
}

fn default_worker_count() -> usize {
    2
}

fn default_update_timeout() -> u64 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_mode: default_save_mode(),
            auto_save_interval_secs: default_auto_save_interval(),
            mastery_threshold: default_mastery_threshold(),
            top_n_default: default_top_n(),
            worker_count: default_worker_count(),
            update_timeout_secs: default_update_timeout(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML string, filling omitted fields
    /// with their defaults.
    pub fn from_toml_str(input: &str) -> VocablyResult<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| VocablyError::Config(format!("Invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> VocablyResult<()> {
        if self.worker_count == 0 {
            return Err(VocablyError::Config(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.auto_save_interval_secs == 0 {
            return Err(VocablyError::Config(
                "auto_save_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
