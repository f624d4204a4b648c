use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::location::ResolvedLocation;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON file holding the last resolved location set.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot, `None` if it was never written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<Vec<ResolvedLocation>>, SnapshotError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No snapshot found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let locations: Vec<ResolvedLocation> = serde_json::from_slice(&bytes)?;
        debug!("Loaded snapshot with {} locations", locations.len());
        Ok(Some(locations))
    }

    /// Overwrite the snapshot. Writes to a sibling temp file first and renames
    /// it into place so a crash never leaves a truncated snapshot.
    #[instrument(skip(self, locations), fields(path = %self.path.display(), count = locations.len()))]
    pub async fn save(&self, locations: &[ResolvedLocation]) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(locations)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        info!("Saved snapshot with {} locations", locations.len());
        Ok(())
    }
}
