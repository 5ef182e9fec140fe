use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use super::credentials::{OperatorCredentials, PresentedCredentials};
use crate::error::ApiError;

/// Validates presented credentials against the configured operator.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    operator: OperatorCredentials,
}

impl CredentialGate {
    pub fn new(operator: OperatorCredentials) -> Self {
        Self { operator }
    }

    pub fn authorize(&self, presented: &PresentedCredentials) -> bool {
        let username = presented
            .username
            .as_bytes()
            .ct_eq(self.operator.username().as_bytes());
        let password = presented
            .password
            .as_bytes()
            .ct_eq(self.operator.password().as_bytes());
        (username & password).into()
    }

    pub fn authorize_headers(&self, headers: &HeaderMap) -> bool {
        PresentedCredentials::from_headers(headers).is_some_and(|creds| self.authorize(&creds))
    }
}

/// Middleware for guarded routes: rejects before the handler runs.
pub async fn require_operator(
    State(gate): State<Arc<CredentialGate>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !gate.authorize_headers(request.headers()) {
        warn!(path = %request.uri().path(), "rejected request without valid credentials");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
