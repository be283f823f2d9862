//! Snapshot store trait.

use async_trait::async_trait;

use crate::error::Result;

/// On-device key-value slot caching the last-known session.
///
/// Only the session manager writes it.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored bytes, or `None` if nothing is stored.
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    async fn save(&self, bytes: &[u8]) -> Result<()>;

    /// Removes the stored bytes. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}
