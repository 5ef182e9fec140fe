//! Filesystem helpers for the session store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{LivenessError, LivenessResult};

pub(crate) async fn exists(path: &Path) -> LivenessResult<bool> {
    fs::try_exists(path).await.map_err(|e| LivenessError::Store {
        message: format!("failed to stat {}: {}", path.display(), e),
    })
}

/// Hidden, per-writer temp name next to the target so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()))
}

/// Write `bytes` to `path` so that readers never see a partial file.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> LivenessResult<()> {
    let temp_path = temp_path(path);

    if let Err(e) = write_synced(&temp_path, bytes).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(LivenessError::Store {
            message: format!("failed to write temp file: {}", e),
        });
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(LivenessError::Store {
            message: format!("failed to rename temp file: {}", e),
        });
    }

    Ok(())
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}
