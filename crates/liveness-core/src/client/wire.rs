//! Request/response bodies of the provider protocol. No HTTP here.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::types::SessionStatus;

const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateSessionRequest<'a> {
    pub client_request_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetResultsRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetResultsResponse {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reference_image: Option<ImageBlob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ImageBlob {
    /// Base64 image bytes.
    #[serde(default)]
    pub bytes: Option<String>,
}

/// Error body: `{"__type": "...#SessionNotFoundException", "Message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServiceError {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

impl ServiceError {
    /// Falls back to a truncated raw body when the error is not JSON.
    pub(crate) fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            let text = String::from_utf8_lossy(body);
            Self {
                error_type: None,
                message: (!text.is_empty())
                    .then(|| text.chars().take(MAX_ERROR_BODY_CHARS).collect()),
            }
        })
    }

    /// Error type without its namespace prefix.
    pub(crate) fn kind(&self) -> &str {
        match &self.error_type {
            Some(t) => t.rsplit('#').next().unwrap_or(t),
            None => "UnknownError",
        }
    }

    pub(crate) fn is_session_not_found(&self) -> bool {
        self.kind() == "SessionNotFoundException"
    }

    pub(crate) fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("no message")
    }
}

/// Transport metadata in the shape the provider SDKs report it.
pub(crate) fn response_metadata(status: StatusCode, headers: &HeaderMap) -> serde_json::Value {
    let http_headers: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                serde_json::Value::String(String::from_utf8_lossy(value.as_bytes()).to_string()),
            )
        })
        .collect();

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    serde_json::json!({
        "RequestId": request_id,
        "HTTPStatusCode": status.as_u16(),
        "HTTPHeaders": http_headers,
        "RetryAttempts": 0,
    })
}
