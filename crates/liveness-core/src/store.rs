//! File-backed store for completed sessions.
//!
//! # Layout
//!
//! ```text
//! files/
//!   {session_id}.json   # SessionRecord, written once
//!   {session_id}.jpg    # reference image (optional)
//! ```
//!
//! Both files are written to a temporary sibling and renamed into place, so a
//! reader sees either nothing or the complete file. The store does not enforce
//! write-once itself; [`crate::SessionOrchestrator`] never writes a key twice.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use crate::error::{LivenessError, LivenessResult};
use crate::types::{validate_session_id, SessionRecord};

mod io;
mod keys;
mod list;
mod read;

/// A persisted session as shown in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionListing {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Session store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store over `dir`. Nothing is touched on disk until first use.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> LivenessResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| LivenessError::Store {
                message: format!("failed to create {}: {}", self.dir.display(), e),
            })
    }

    fn record_path(&self, session_id: &str) -> LivenessResult<PathBuf> {
        validate_session_id(session_id)?;
        Ok(keys::record_path(&self.dir, session_id))
    }

    fn image_path(&self, session_id: &str) -> LivenessResult<PathBuf> {
        validate_session_id(session_id)?;
        Ok(keys::image_path(&self.dir, session_id))
    }

    /// Whether a completed record was persisted for this session.
    pub async fn has(&self, session_id: &str) -> LivenessResult<bool> {
        let path = self.record_path(session_id)?;
        io::exists(&path).await
    }

    /// Read a persisted record.
    pub async fn read(&self, session_id: &str) -> LivenessResult<SessionRecord> {
        let path = self.record_path(session_id)?;
        read::read_record(&path, session_id).await
    }

    /// Persist a record.
    pub async fn write(&self, session_id: &str, record: &SessionRecord) -> LivenessResult<()> {
        let path = self.record_path(session_id)?;
        let bytes = serde_json::to_vec(record).map_err(|e| LivenessError::Store {
            message: format!("failed to serialize record for {}: {}", session_id, e),
        })?;

        self.ensure_dir().await?;
        io::write_atomic(&path, &bytes).await?;
        tracing::debug!(session_id, path = %path.display(), "wrote session record");
        Ok(())
    }

    /// Whether a reference image was persisted for this session.
    pub async fn has_image(&self, session_id: &str) -> LivenessResult<bool> {
        let path = self.image_path(session_id)?;
        io::exists(&path).await
    }

    /// Persist a reference image.
    pub async fn write_image(&self, session_id: &str, bytes: &[u8]) -> LivenessResult<()> {
        let path = self.image_path(session_id)?;

        self.ensure_dir().await?;
        io::write_atomic(&path, bytes).await?;
        tracing::debug!(session_id, size = bytes.len(), "wrote reference image");
        Ok(())
    }

    /// Read a persisted reference image.
    pub async fn read_image(&self, session_id: &str) -> LivenessResult<Vec<u8>> {
        let path = self.image_path(session_id)?;
        read::read_image(&path, session_id).await
    }

    /// Snapshot of all persisted records, most recent first.
    pub async fn list(&self) -> LivenessResult<Vec<SessionListing>> {
        list::list_records(&self.dir).await
    }
}
