//! Session store behaviour configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings applied to every session store and directory call made on
/// the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound for a single external call, in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

impl SessionConfig {
    /// The operation timeout as a `Duration`.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

fn default_operation_timeout() -> u64 {
    1000
}
