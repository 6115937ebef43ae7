use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Tunables for a [`CommentStore`](crate::CommentStore).
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the serialized comment map is stored under.
    pub storage_key: String,
    /// Artificial delay before each mutation, standing in for a network
    /// round-trip. Zero disables it.
    pub simulated_latency_ms: u64,
    /// Start from the example threads when nothing usable is persisted.
    /// When off, the store starts empty instead.
    pub seed_when_empty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: "@comments".into(),
            simulated_latency_ms: 100,
            seed_when_empty: true,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        if config.storage_key.trim().is_empty() {
            return Err(SdkError::Config("storage_key must not be empty".into()));
        }
        Ok(config)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Same configuration with the artificial delay turned off.
    pub fn without_latency(mut self) -> Self {
        self.simulated_latency_ms = 0;
        self
    }
}
