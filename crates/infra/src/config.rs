//! Runtime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the write path and the projection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How long a mutation may wait for the per-account row lock before it
    /// fails with a retryable timeout.
    pub lock_wait_ms: u64,

    /// Number of recent entries included in a rebuilt account summary.
    pub history_window: usize,

    /// Poll interval of the projection worker's shutdown check.
    pub worker_tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_wait_ms: 5_000,
            history_window: 100,
            worker_tick_ms: 250,
        }
    }
}

impl Config {
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }

    pub fn worker_tick(&self) -> Duration {
        Duration::from_millis(self.worker_tick_ms)
    }
}
