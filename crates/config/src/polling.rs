//! Wallet readiness polling tunables.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollingConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Bounds for the readiness polling loop.
///
/// Exact numbers are tunables: the loop only needs a finite ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Maximum number of readiness checks per connection attempt
    pub max_attempts: u32,
    /// Delay between two checks, in milliseconds
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 1_000,
        }
    }
}

impl PollingConfig {
    pub const fn new(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            interval_ms,
        }
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub const fn validate(&self) -> Result<(), PollingConfigError> {
        if self.max_attempts == 0 {
            return Err(PollingConfigError::ZeroAttempts);
        }
        Ok(())
    }
}
