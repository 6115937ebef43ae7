use async_trait::async_trait;

use crate::error::StoreResult;

/// Async key-value persistence.
///
/// All implementations must satisfy these invariants:
/// - `get` after a successful `set` returns the value that was set.
/// - `remove` is idempotent: removing a missing key succeeds.
/// - Failures are reported, never silently ignored. Callers decide whether
///   a failure degrades durability or aborts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the value under `key`.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
