//! HTTP layer: request framing, status mapping, response metadata.
//!
//! This is the ONLY place for status code handling. No retries: the caller's
//! next poll is the retry.

use reqwest::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LivenessError, LivenessResult};

use super::wire::{response_metadata, ServiceError};

const CONTENT_TYPE_VALUE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "RekognitionService";

const X_AMZ_TARGET: HeaderName = HeaderName::from_static("x-amz-target");

/// Successful reply: raw body plus the transport metadata kept alongside results.
#[derive(Debug)]
pub(crate) struct RpcReply {
    pub body: Vec<u8>,
    pub metadata: serde_json::Value,
}

impl RpcReply {
    pub(crate) fn parse<T: DeserializeOwned>(&self) -> LivenessResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| LivenessError::InvalidResponse {
            message: format!("failed to parse response body: {}", e),
        })
    }
}

/// HTTP backend (holds reqwest client, endpoint, optional token).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) endpoint: String,
    pub(crate) token: Option<String>,
}

impl HttpBackend {
    /// Invoke one operation. `session_id` names the subject for not-found mapping.
    pub(crate) async fn call<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        payload: &B,
        session_id: Option<&str>,
    ) -> LivenessResult<RpcReply> {
        let url = format!("{}/", self.endpoint);
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_VALUE)
            .header(X_AMZ_TARGET, format!("{}.{}", TARGET_PREFIX, operation))
            .json(payload);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        debug!(operation, url = %url, "calling remote service");
        let response = request.send().await?;
        let status = response.status();
        let metadata = response_metadata(status, response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| LivenessError::Remote {
                message: format!("failed to read response body: {}", e),
            })?
            .to_vec();

        if status.is_success() {
            return Ok(RpcReply { body, metadata });
        }

        let service_error = ServiceError::from_body(&body);
        if let Some(session_id) = session_id {
            if status.as_u16() == 404 || service_error.is_session_not_found() {
                debug!(operation, session_id, "remote has no such session");
                return Err(LivenessError::session_not_found(session_id));
            }
        }

        warn!(
            operation,
            status = status.as_u16(),
            error_type = service_error.kind(),
            "remote call failed"
        );
        Err(LivenessError::Remote {
            message: format!(
                "HTTP {} {}: {}",
                status.as_u16(),
                service_error.kind(),
                service_error.message()
            ),
        })
    }
}
