//! Directory listing for the index view.

use std::cmp::Reverse;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::warn;

use crate::error::{LivenessError, LivenessResult};
use crate::types::validate_session_id;

use super::keys::record_stem;
use super::read::read_record;
use super::SessionListing;

pub(crate) async fn list_records(dir: &Path) -> LivenessResult<Vec<SessionListing>> {
    let mut result = Vec::new();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(result),
        Err(e) => {
            return Err(LivenessError::Store {
                message: format!("failed to read store directory: {}", e),
            })
        }
    };

    while let Some(entry) = entries.next_entry().await.map_err(|e| LivenessError::Store {
        message: format!("failed to read directory entry: {}", e),
    })? {
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(session_id) = record_stem(&file_name) else {
            continue;
        };
        if validate_session_id(session_id).is_err() {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!(session_id, error = %e, "skipping unreadable record");
                continue;
            }
        };

        let record = match read_record(&entry.path(), session_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(session_id, error = %e, "skipping record in listing");
                continue;
            }
        };

        // Records from older deployments carry no timestamp; use the file's.
        let created_at = match record.created_at {
            Some(created_at) => created_at,
            None => match metadata.created().or_else(|_| metadata.modified()) {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    warn!(session_id, error = %e, "no creation time for record");
                    continue;
                }
            },
        };

        result.push(SessionListing {
            session_id: session_id.to_string(),
            created_at,
        });
    }

    result.sort_by(|a, b| {
        Reverse(a.created_at)
            .cmp(&Reverse(b.created_at))
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    Ok(result)
}
