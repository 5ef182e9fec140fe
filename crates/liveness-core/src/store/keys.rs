//! Path derivation. Callers validate the session id first.

use std::path::{Path, PathBuf};

pub(crate) const RECORD_EXT: &str = "json";
pub(crate) const IMAGE_EXT: &str = "jpg";

pub(crate) fn record_path(dir: &Path, session_id: &str) -> PathBuf {
    dir.join(format!("{}.{}", session_id, RECORD_EXT))
}

pub(crate) fn image_path(dir: &Path, session_id: &str) -> PathBuf {
    dir.join(format!("{}.{}", session_id, IMAGE_EXT))
}

/// Session id of a record file name, if it is one.
pub(crate) fn record_stem(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    file_name
        .strip_suffix(RECORD_EXT)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
}
