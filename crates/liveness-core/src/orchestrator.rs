//! Session resolution.
//!
//! Resolves a session id with the following priority:
//! 1. Store (a captured record is authoritative; the remote is never asked again)
//! 2. Remote service
//!    - `SUCCEEDED`: image then record are written, the record is returned
//!    - anything else: status only, nothing is written
//!
//! The remote leg runs under a per-session lock and re-checks the store once the
//! lock is held, so concurrent first reads of one session capture it once.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::client::VerificationClient;
use crate::error::LivenessResult;
use crate::locks::KeyedLocks;
use crate::store::SessionStore;
use crate::types::{validate_session_id, RemoteResult, SessionRecord, SessionStatus};

/// Outcome of [`SessionOrchestrator::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Served from the store without contacting the remote service.
    Cached(SessionRecord),

    /// `SUCCEEDED` observed for the first time and persisted by this call.
    Captured(SessionRecord),

    /// Any other status. Never persisted; the caller polls again.
    Pending(SessionStatus),
}

impl Resolution {
    pub fn record(&self) -> Option<&SessionRecord> {
        match self {
            Self::Cached(record) | Self::Captured(record) => Some(record),
            Self::Pending(_) => None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        match self {
            Self::Cached(record) | Self::Captured(record) => &record.status,
            Self::Pending(status) => status,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// Session state machine over a verification client and a store.
pub struct SessionOrchestrator {
    client: Arc<dyn VerificationClient>,
    store: SessionStore,
    locks: KeyedLocks,
}

impl SessionOrchestrator {
    pub fn new(client: Arc<dyn VerificationClient>, store: SessionStore) -> Self {
        Self {
            client,
            store,
            locks: KeyedLocks::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new remote session.
    pub async fn create_session(&self) -> LivenessResult<String> {
        self.client.create_session().await
    }

    /// Resolve a session to its captured record or its current remote status.
    pub async fn resolve(&self, session_id: &str) -> LivenessResult<Resolution> {
        validate_session_id(session_id)?;

        if self.store.has(session_id).await? {
            debug!(session_id, "cache hit");
            return Ok(Resolution::Cached(self.store.read(session_id).await?));
        }

        let _guard = self.locks.lock(session_id).await;

        // Another request may have captured it while we waited.
        if self.store.has(session_id).await? {
            debug!(session_id, "captured by concurrent request");
            return Ok(Resolution::Cached(self.store.read(session_id).await?));
        }

        debug!(session_id, "cache miss, querying remote");
        let remote = self.client.get_result(session_id).await?;

        if !remote.status.is_terminal_success() {
            debug!(session_id, status = %remote.status, "session not captured");
            return Ok(Resolution::Pending(remote.status));
        }

        let record = self.capture(session_id, remote).await?;
        Ok(Resolution::Captured(record))
    }

    /// Persist a terminal-success result: image first, then the record that implies it.
    async fn capture(
        &self,
        session_id: &str,
        remote: RemoteResult,
    ) -> LivenessResult<SessionRecord> {
        let (record, image) = remote.into_capture(session_id, Utc::now())?;

        if let Some(image) = &image {
            self.store.write_image(session_id, image).await?;
        }
        self.store.write(session_id, &record).await?;

        info!(
            session_id,
            confidence = record.confidence,
            has_image = image.is_some(),
            "captured liveness result"
        );
        Ok(record)
    }
}
