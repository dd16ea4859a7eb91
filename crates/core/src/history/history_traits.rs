use crate::errors::Result;

/// Key-value blob storage used to persist history snapshots.
///
/// Implementations only move opaque strings; the snapshot format is owned by
/// `QuoteHistoryStore`.
pub trait BlobStoreTrait: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was stored.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
