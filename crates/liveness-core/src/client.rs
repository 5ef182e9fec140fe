//! Boundary to the remote face-liveness service.
//!
//! Public API: no status code knowledge. All HTTP/status mapping lives in `http.rs`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LivenessError, LivenessResult};
use crate::types::{RemoteConfig, RemoteResult};

mod http;
mod wire;

use http::HttpBackend;
use wire::{CreateSessionRequest, CreateSessionResponse, GetResultsRequest, GetResultsResponse};

const USER_AGENT_VALUE: &str = concat!("liveness-gateway/", env!("CARGO_PKG_VERSION"));

const CREATE_SESSION: &str = "CreateFaceLivenessSession";
const GET_RESULTS: &str = "GetFaceLivenessSessionResults";

/// The two operations this system needs from the remote service.
#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// Start a new remote session and return its id.
    async fn create_session(&self) -> LivenessResult<String>;

    /// Fetch the current status (and, once succeeded, the result) of a session.
    async fn get_result(&self, session_id: &str) -> LivenessResult<RemoteResult>;
}

/// HTTP client for the provider's JSON protocol.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    http: HttpBackend,
}

impl HttpVerificationClient {
    pub fn new(config: RemoteConfig) -> LivenessResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| LivenessError::Remote {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                endpoint: config.endpoint_url(),
                token: config.token,
            },
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.http.endpoint
    }
}

#[async_trait]
impl VerificationClient for HttpVerificationClient {
    async fn create_session(&self) -> LivenessResult<String> {
        // Distinct from the session id; lets the provider dedupe retried creates.
        let client_request_token = Uuid::new_v4().to_string();
        let request = CreateSessionRequest {
            client_request_token: &client_request_token,
        };

        let response: CreateSessionResponse = self
            .http
            .call(CREATE_SESSION, &request, None)
            .await?
            .parse()?;

        info!(session_id = %response.session_id, "created liveness session");
        Ok(response.session_id)
    }

    async fn get_result(&self, session_id: &str) -> LivenessResult<RemoteResult> {
        debug!(session_id, "fetching liveness result");

        let reply = self
            .http
            .call(GET_RESULTS, &GetResultsRequest { session_id }, Some(session_id))
            .await?;
        let response_metadata = reply.metadata.clone();
        let body: GetResultsResponse = reply.parse()?;

        let reference_image = match body.reference_image.and_then(|image| image.bytes) {
            Some(encoded) => Some(BASE64.decode(encoded.as_bytes()).map_err(|e| {
                LivenessError::InvalidResponse {
                    message: format!("reference image is not valid base64: {}", e),
                }
            })?),
            None => None,
        };

        debug!(session_id, status = %body.status, "remote status");
        Ok(RemoteResult {
            session_id: body.session_id,
            status: body.status,
            confidence: body.confidence,
            reference_image,
            response_metadata,
        })
    }
}
