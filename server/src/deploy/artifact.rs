//! Repository archive unpacking

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::errors::ServiceError;

/// One file extracted from a repository archive
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Path relative to the repository root
    pub path: String,
    pub content: Vec<u8>,
}

/// Unpack a repository zipball into artifacts.
///
/// Zipball entries are wrapped in a synthetic `<repo>-<branch>-<hash>/`
/// directory; the first path segment is stripped from every entry.
/// Directory entries, entries with an empty stripped path and entries
/// whose stripped path starts with `.` are excluded.
pub fn unpack(archive: &[u8]) -> Result<Vec<Artifact>, ServiceError> {
    let cursor = Cursor::new(archive);
    let mut zip =
        ZipArchive::new(cursor).map_err(|e| ServiceError::ArchiveError(e.to_string()))?;

    let mut artifacts = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| ServiceError::ArchiveError(e.to_string()))?;

        if entry.is_dir() {
            continue;
        }

        let path = match entry.name().split_once('/') {
            Some((_, rest)) => rest.to_string(),
            None => continue,
        };
        if path.is_empty() || path.starts_with('.') || path.starts_with('/') {
            continue;
        }

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| ServiceError::ArchiveError(e.to_string()))?;

        artifacts.push(Artifact { path, content });
    }

    Ok(artifacts)
}

/// Map a file name to its MIME type by extension, case-insensitively
pub fn content_type(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
