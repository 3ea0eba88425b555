//! Durable key-value store boundary.

use async_trait::async_trait;

use crate::error::Result;

/// Asynchronous, string-keyed, string-valued durable storage.
///
/// Each state slice exclusively owns one key; no two slices read or write
/// the same key. Operations may fail but never corrupt other keys, and
/// writes to a given key are applied in submission order.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// An absent key is a valid, expected outcome (`Ok(None)`), not an error.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
