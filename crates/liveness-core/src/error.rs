//! Error types for the liveness core.

/// Liveness errors.
#[derive(Debug, thiserror::Error)]
pub enum LivenessError {
    /// Record, image or remote session does not exist.
    #[error("{kind} not found: {session_id}")]
    NotFound {
        kind: &'static str,
        session_id: String,
    },

    /// Session id cannot be used as a store key.
    #[error("invalid session id {session_id:?}: {reason}")]
    InvalidSessionId { session_id: String, reason: String },

    /// Transport or service-side failure from the remote service.
    #[error("remote error: {message}")]
    Remote { message: String },

    /// Remote service answered with a payload we cannot interpret.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// A cached record exists but does not parse.
    #[error("malformed cache record for {session_id}: {message}")]
    MalformedCache { session_id: String, message: String },

    /// Filesystem failure in the session store.
    #[error("store error: {message}")]
    Store { message: String },
}

impl LivenessError {
    pub(crate) fn record_not_found(session_id: &str) -> Self {
        Self::NotFound {
            kind: "record",
            session_id: session_id.to_string(),
        }
    }

    pub(crate) fn image_not_found(session_id: &str) -> Self {
        Self::NotFound {
            kind: "image",
            session_id: session_id.to_string(),
        }
    }

    pub(crate) fn session_not_found(session_id: &str) -> Self {
        Self::NotFound {
            kind: "session",
            session_id: session_id.to_string(),
        }
    }

    /// Whether the caller asked for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidSessionId { .. })
    }

    /// Whether the failure originated at the remote service boundary.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::InvalidResponse { .. })
    }
}

impl From<reqwest::Error> for LivenessError {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote {
            message: err.to_string(),
        }
    }
}

/// Result type for liveness operations.
pub type LivenessResult<T> = Result<T, LivenessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_resource() {
        let err = LivenessError::image_not_found("abc");
        assert_eq!(err.to_string(), "image not found: abc");
        assert!(err.is_not_found());
        assert!(!err.is_remote());
    }

    #[test]
    fn test_invalid_session_id_counts_as_not_found() {
        let err = LivenessError::InvalidSessionId {
            session_id: "../etc".to_string(),
            reason: "contains '.'".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_classification() {
        let err = LivenessError::InvalidResponse {
            message: "missing SessionId".to_string(),
        };
        assert!(err.is_remote());
        assert!(!LivenessError::Store {
            message: "disk full".to_string()
        }
        .is_remote());
    }
}
