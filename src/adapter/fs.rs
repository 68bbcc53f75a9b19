//! Filesystem queries shared by the path-backed adapters.
//!
//! Every helper swallows its I/O error after logging it; callers only see
//! `None`/`false`.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::detection::{self, SNIFF_LEN};
use crate::error::{Result, SourceError};
use crate::stream::read_up_to;

/// Canonical form of `path`, or its lexical absolute form when it does not
/// resolve. `None` when not even that exists, as for an empty path.
pub(super) fn resolve(path: &Path) -> Option<PathBuf> {
    match fs::canonicalize(path) {
        Ok(canonical) => Some(canonical),
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "canonicalize failed");
            std::path::absolute(path)
                .map_err(|e| tracing::debug!(path = %path.display(), error = %e, "no absolute form"))
                .ok()
        }
    }
}

pub(super) fn display(path: &Path) -> Option<String> {
    resolve(path).map(|p| p.to_string_lossy().into_owned())
}

pub(super) fn filename(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(detection::basename)
}

/// A regular file that opens for reading right now.
pub(super) fn is_readable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => match File::open(path) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "file not readable");
                false
            }
        },
        Ok(_) => false,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "stat failed");
            false
        }
    }
}

pub(super) fn size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .map_err(|e| tracing::debug!(path = %path.display(), error = %e, "stat failed"))
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

pub(super) fn modified(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

/// Leading bytes of the file, read through a handle opened and closed here.
pub(super) fn head(path: &Path) -> Option<Vec<u8>> {
    let file = File::open(path)
        .map_err(|e| tracing::debug!(path = %path.display(), error = %e, "open for sniffing failed"))
        .ok()?;
    read_up_to(file, SNIFF_LEN).ok()
}

/// Sniffed content type, falling back to the file's own extension. A file
/// that cannot be opened has no type.
pub(super) fn mime_type(path: &Path) -> Option<String> {
    let head = head(path)?;
    let extension = filename(path).as_deref().and_then(detection::extension_of);
    detection::resolve(None, || Some(head), extension.as_deref())
}

pub(super) fn read(path: &Path) -> Result<Bytes> {
    match fs::read(path) {
        Ok(data) => Ok(Bytes::from(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(SourceError::NotFound(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}
