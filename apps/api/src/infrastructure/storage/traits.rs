use async_trait::async_trait;
use std::path::Path;

/// Destination for the normalized PNG of each submission.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replaces the stored snapshot with `png`.
    async fn save(&self, png: &[u8]) -> anyhow::Result<()>;
    fn path(&self) -> &Path;
}
