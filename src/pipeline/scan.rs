//! Input enumeration: resolve the run's directories and list candidate PDFs.
//!
//! Candidates are the input directory's immediate entries that are files
//! with a case-insensitive `.pdf` extension. They are returned in the order
//! the directory listing yields them; no sorting is imposed.

use crate::error::BatchError;
use crate::output::Document;
use std::path::{Path, PathBuf};
use tokio_stream::wrappers::ReadDirStream;
use tokio_stream::StreamExt;
use tracing::debug;

/// Resolve `path` against the current working directory.
///
/// The path does not need to exist.
pub fn absolute(path: &Path) -> Result<PathBuf, BatchError> {
    std::path::absolute(path)
        .map_err(|e| BatchError::Internal(format!("Cannot resolve '{}': {e}", path.display())))
}

/// Check if the path has a `.pdf` extension, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// List the PDF documents directly inside `input_dir`.
///
/// `input_dir` must already be absolute so each [`Document::path`] is too.
pub async fn list_documents(input_dir: &Path) -> Result<Vec<Document>, BatchError> {
    let unreadable = |e: std::io::Error| BatchError::InputDirUnreadable {
        path: input_dir.to_path_buf(),
        source: e,
    };

    let read_dir = tokio::fs::read_dir(input_dir).await.map_err(unreadable)?;
    let mut entries = ReadDirStream::new(read_dir);
    let mut documents = Vec::new();

    while let Some(entry) = entries.next().await {
        let path = entry.map_err(unreadable)?.path();

        if !is_pdf(&path) {
            debug!("Ignoring non-PDF entry: {}", path.display());
            continue;
        }

        // Follows symlinks, so a link to a PDF counts as a file.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                debug!("Ignoring directory with .pdf name: {}", path.display());
                continue;
            }
            Err(e) => {
                debug!("Ignoring unreadable entry {}: {}", path.display(), e);
                continue;
            }
        }

        match Document::new(path) {
            Some(doc) => documents.push(doc),
            None => debug!("Ignoring entry without a file name"),
        }
    }

    Ok(documents)
}
