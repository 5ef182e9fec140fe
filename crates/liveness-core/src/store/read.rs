//! Read path for records and images.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{LivenessError, LivenessResult};
use crate::types::SessionRecord;

pub(crate) async fn read_record(path: &Path, session_id: &str) -> LivenessResult<SessionRecord> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(session_id, "record not in store");
            return Err(LivenessError::record_not_found(session_id));
        }
        Err(e) => {
            return Err(LivenessError::Store {
                message: format!("failed to read record {}: {}", session_id, e),
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(session_id, error = %e, "cached record does not parse");
        LivenessError::MalformedCache {
            session_id: session_id.to_string(),
            message: e.to_string(),
        }
    })
}

pub(crate) async fn read_image(path: &Path, session_id: &str) -> LivenessResult<Vec<u8>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(LivenessError::image_not_found(session_id))
        }
        Err(e) => Err(LivenessError::Store {
            message: format!("failed to read image {}: {}", session_id, e),
        }),
    }
}
