use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Failure behavior of an [`InMemoryKeyValueStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultMode {
    /// All operations succeed.
    #[default]
    Healthy,
    /// Reads succeed; `set` and `remove` fail with [`StoreError::ReadOnly`].
    ReadOnly,
    /// Every operation fails with [`StoreError::Unavailable`].
    Unavailable,
}

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` and
/// cloned on read. The fault mode can be flipped at runtime to simulate a
/// full disk or a storage subsystem that fails to open.
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    fault: RwLock<FaultMode>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty, healthy store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fault: RwLock::new(FaultMode::Healthy),
        }
    }

    /// Create a store pre-populated with one value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.insert_raw(key, value);
        store
    }

    /// Switch the failure behavior for subsequent operations.
    pub fn set_fault(&self, mode: FaultMode) {
        *self.fault.write().expect("lock poisoned") = mode;
    }

    pub fn fault(&self) -> FaultMode {
        *self.fault.read().expect("lock poisoned")
    }

    /// Write a value directly, bypassing the fault mode.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.into(), value.into());
    }

    /// Read a value directly, bypassing the fault mode.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().expect("lock poisoned").contains_key(key)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    fn check_read(&self) -> StoreResult<()> {
        match self.fault() {
            FaultMode::Unavailable => Err(StoreError::Unavailable),
            FaultMode::Healthy | FaultMode::ReadOnly => Ok(()),
        }
    }

    fn check_write(&self) -> StoreResult<()> {
        match self.fault() {
            FaultMode::Unavailable => Err(StoreError::Unavailable),
            FaultMode::ReadOnly => Err(StoreError::ReadOnly),
            FaultMode::Healthy => Ok(()),
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_read()?;
        Ok(self.get_raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_write()?;
        debug!(key, bytes = value.len(), "memory store set");
        self.insert_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_write()?;
        let existed = self
            .entries
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some();
        debug!(key, existed, "memory store remove");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyValueStore")
            .field("key_count", &self.len())
            .field("fault", &self.fault())
            .finish()
    }
}
