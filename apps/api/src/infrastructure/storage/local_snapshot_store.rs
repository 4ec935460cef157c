use super::traits::SnapshotStore;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Keeps the latest normalized drawing at a fixed path on local disk.
///
/// Every save goes to a request-unique sibling file first and is then renamed
/// over the target, so concurrent saves never leave a partially written PNG:
/// the file always holds one complete image, whichever rename landed last.
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(format!(".{}.tmp", Uuid::now_v7()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn save(&self, png: &[u8]) -> anyhow::Result<()> {
        let staging = self.staging_path();
        tokio::fs::write(&staging, png)
            .await
            .with_context(|| format!("failed to write {}", staging.display()))?;

        if let Err(err) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err).with_context(|| format!("failed to replace {}", self.path.display()));
        }

        tracing::debug!(path = %self.path.display(), bytes = png.len(), "snapshot saved");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
