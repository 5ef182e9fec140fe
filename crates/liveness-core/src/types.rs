//! Session data model and remote service configuration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LivenessError, LivenessResult};

/// Longest session id accepted as a store key.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Status reported by the remote service for a session.
///
/// The set of values is owned by the provider, so unknown strings are kept
/// verbatim in [`SessionStatus::Unrecognized`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Created,
    InProgress,
    Succeeded,
    Failed,
    Expired,
    Error,
    Unrecognized(String),
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::InProgress => "IN_PROGRESS",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Error => "ERROR",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Only this status is ever captured into the store.
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<String> for SessionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "CREATED" => Self::Created,
            "IN_PROGRESS" => Self::InProgress,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "EXPIRED" => Self::Expired,
            "ERROR" => Self::Error,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<&str> for SessionStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed session as persisted in the store.
///
/// Written once, when a poll first observes `SUCCEEDED`, and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub status: SessionStatus,

    /// Liveness confidence score (0-100).
    pub confidence: f64,

    pub session_id: String,

    /// Diagnostic payload from the remote call, kept verbatim.
    pub response_metadata: serde_json::Value,

    /// When the record was captured. Absent in records written by older deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Current state of a session as reported by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResult {
    pub session_id: String,
    pub status: SessionStatus,

    /// Present only for `SUCCEEDED`.
    pub confidence: Option<f64>,

    /// Raw image bytes, present for some `SUCCEEDED` results.
    pub reference_image: Option<Vec<u8>>,

    pub response_metadata: serde_json::Value,
}

impl RemoteResult {
    /// Split a terminal-success result into the record to persist and its optional image.
    pub fn into_capture(
        self,
        session_id: &str,
        created_at: DateTime<Utc>,
    ) -> LivenessResult<(SessionRecord, Option<Vec<u8>>)> {
        let confidence = self
            .confidence
            .ok_or_else(|| LivenessError::InvalidResponse {
                message: format!("{} result for {} has no confidence", self.status, session_id),
            })?;

        let record = SessionRecord {
            status: self.status,
            confidence,
            session_id: session_id.to_string(),
            response_metadata: self.response_metadata,
            created_at: Some(created_at),
        };

        Ok((record, self.reference_image))
    }
}

/// Check that a session id is safe to use as a file stem.
pub fn validate_session_id(session_id: &str) -> LivenessResult<()> {
    let invalid = |reason: String| LivenessError::InvalidSessionId {
        session_id: session_id.to_string(),
        reason,
    };

    if session_id.is_empty() {
        return Err(invalid("empty".to_string()));
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(invalid(format!(
            "longer than {} characters",
            MAX_SESSION_ID_LEN
        )));
    }
    if let Some(c) = session_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(format!("contains {:?}", c)));
    }

    Ok(())
}

/// Remote service configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Provider region; selects the default endpoint.
    pub region: String,

    /// Explicit endpoint, overriding the regional default.
    pub endpoint: Option<String>,

    /// Bearer token sent with every request.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl RemoteConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `LIVENESS_REGION` | Provider region |
    /// | `LIVENESS_ENDPOINT` | Endpoint override |
    /// | `LIVENESS_TOKEN` | Bearer token |
    /// | `LIVENESS_TIMEOUT` | Timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("LIVENESS_REGION").unwrap_or_else(|_| default_region()),
            endpoint: std::env::var("LIVENESS_ENDPOINT")
                .ok()
                .filter(|v| !v.is_empty()),
            token: std::env::var("LIVENESS_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout_secs: std::env::var("LIVENESS_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Endpoint requests are sent to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://rekognition.{}.amazonaws.com", self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_status_roundtrips_known_and_unknown_values() {
        let known: SessionStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(known, SessionStatus::InProgress);

        let unknown: SessionStatus = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(unknown, SessionStatus::Unrecognized("PAUSED".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"PAUSED\"");
        assert!(!unknown.is_terminal_success());
    }

    #[test]
    fn test_only_succeeded_is_terminal_success() {
        assert!(SessionStatus::Succeeded.is_terminal_success());
        for status in [
            SessionStatus::Created,
            SessionStatus::InProgress,
            SessionStatus::Failed,
            SessionStatus::Expired,
            SessionStatus::Error,
        ] {
            assert!(!status.is_terminal_success(), "{status}");
        }
    }

    #[test]
    fn test_record_json_shape() {
        let record = SessionRecord {
            status: SessionStatus::Succeeded,
            confidence: 98.7,
            session_id: "S1".to_string(),
            response_metadata: serde_json::json!({"RequestId": "r-1"}),
            created_at: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "SUCCEEDED");
        assert_eq!(value["confidence"], 98.7);
        assert_eq!(value["session_id"], "S1");
        assert_eq!(value["response_metadata"]["RequestId"], "r-1");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_legacy_record_without_created_at_parses() {
        let legacy = r#"{"confidence": 91.2, "response_metadata": {}, "session_id": "old", "status": "SUCCEEDED"}"#;
        let record: SessionRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.session_id, "old");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_into_capture_requires_confidence() {
        let result = RemoteResult {
            session_id: "S1".to_string(),
            status: SessionStatus::Succeeded,
            confidence: None,
            reference_image: None,
            response_metadata: serde_json::Value::Null,
        };
        let err = result.into_capture("S1", Utc::now()).unwrap_err();
        assert!(matches!(err, LivenessError::InvalidResponse { .. }));
    }

    #[test]
    fn test_validate_session_id() {
        assert!(validate_session_id("3f1c2a9e-51b8-4c1e-9f0d-0c2a7d1e5b6a").is_ok());
        assert!(validate_session_id("session_01").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("../secrets").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id("name.json").is_err());
        assert!(validate_session_id(&"x".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_endpoint_defaults_to_region() {
        let config = RemoteConfig::default().with_region("us-east-1");
        assert_eq!(
            config.endpoint_url(),
            "https://rekognition.us-east-1.amazonaws.com"
        );

        let config = config.with_endpoint("http://localhost:9000/");
        assert_eq!(config.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    #[serial]
    fn test_remote_config_from_env() {
        std::env::set_var("LIVENESS_REGION", "eu-central-1");
        std::env::set_var("LIVENESS_TIMEOUT", "5");
        std::env::remove_var("LIVENESS_ENDPOINT");
        std::env::set_var("LIVENESS_TOKEN", "");

        let config = RemoteConfig::from_env();
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.endpoint.is_none());
        assert!(config.token.is_none());

        std::env::remove_var("LIVENESS_REGION");
        std::env::remove_var("LIVENESS_TIMEOUT");
        std::env::remove_var("LIVENESS_TOKEN");
    }
}
