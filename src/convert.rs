//! Single-document conversion.
//!
//! Each document moves through
//!
//! ```text
//! Pending ──▶ check output folder ──▶ Skipped
//!                   │
//!                   └──▶ Converting ──▶ Succeeded (rewrite image paths)
//!                                  └──▶ Failed    (remove partial output)
//! ```
//!
//! This module owns the one authoritative completion check; the batch
//! orchestrator never looks at the output folder itself and only reads the
//! returned [`ConversionOutcome`]. Every path resolves to an outcome: errors
//! are logged here and never propagate into the batch loop.
//!
//! Side effects are confined to `<output-root>/<document-key>/`.

use crate::config::{BatchConfig, CompletionMarker, SENTINEL_FILE};
use crate::output::{ConversionOutcome, Document};
use crate::pipeline::exec::CommandRunner;
use crate::pipeline::rewrite;
use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Flag the converter expects before the output root.
pub const OUTPUT_DIR_FLAG: &str = "--output_dir";

/// Convert one document into `output_root`.
///
/// `output_root` must be absolute and exist. The converter is invoked as
/// `<program> <absolute-pdf-path> --output_dir <output_root>` and is
/// expected to create `<output_root>/<document-key>/` itself.
pub async fn convert_document(
    doc: &Document,
    output_root: &Path,
    config: &BatchConfig,
    runner: &dyn CommandRunner,
) -> ConversionOutcome {
    let folder = doc.output_folder(output_root);

    match completion_state(&folder, config.completion_marker).await {
        Completion::Complete => {
            info!("Skipping {}: output already exists", doc.key);
            return ConversionOutcome::Skipped;
        }
        Completion::Absent => {}
        Completion::Partial => {
            warn!(
                "Removing incomplete output for {} left by an interrupted run",
                doc.key
            );
            if let Err(e) = tokio::fs::remove_dir_all(&folder).await {
                error!(
                    "Cannot remove incomplete output {}: {}",
                    folder.display(),
                    e
                );
                return ConversionOutcome::Failed;
            }
        }
    }

    info!("Converting {}", doc.path.display());
    let start = Instant::now();

    let args = converter_args(doc, output_root);
    let success = match runner.run(&config.converter_program, &args).await {
        Ok(success) => success,
        Err(e) => {
            error!("{}", e);
            false
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if !success {
        warn!("Conversion of {} failed after {}ms", doc.key, elapsed_ms);
        remove_partial_output(&folder).await;
        return ConversionOutcome::Failed;
    }

    if !rewrite::rewrite_output_folder(&folder, &doc.key, &config.content_server).await {
        warn!("Image paths for {} were not fully rewritten", doc.key);
    }

    if config.completion_marker == CompletionMarker::Sentinel {
        let sentinel = folder.join(SENTINEL_FILE);
        if let Err(e) = tokio::fs::write(&sentinel, b"").await {
            warn!("Cannot write {}: {}", sentinel.display(), e);
        }
    }

    info!("Converted {} in {}ms", doc.key, elapsed_ms);
    ConversionOutcome::Succeeded
}

/// Argument list passed to the external converter.
pub fn converter_args(doc: &Document, output_root: &Path) -> Vec<OsString> {
    vec![
        doc.path.clone().into_os_string(),
        OsString::from(OUTPUT_DIR_FLAG),
        output_root.as_os_str().to_os_string(),
    ]
}

// ── Internal helpers ─────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Completion {
    /// No output folder.
    Absent,
    /// Output folder present and considered finished.
    Complete,
    /// Output folder present but missing its sentinel.
    Partial,
}

async fn completion_state(folder: &Path, marker: CompletionMarker) -> Completion {
    if !exists(folder).await {
        return Completion::Absent;
    }
    match marker {
        CompletionMarker::FolderExists => Completion::Complete,
        CompletionMarker::Sentinel => {
            if exists(&folder.join(SENTINEL_FILE)).await {
                Completion::Complete
            } else {
                Completion::Partial
            }
        }
    }
}

/// Like `Path::exists`: an error while checking counts as absent.
async fn exists(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(found) => found,
        Err(e) => {
            debug!("Cannot stat {}: {}", path.display(), e);
            false
        }
    }
}

/// Delete whatever the converter wrote before failing. Best-effort.
async fn remove_partial_output(folder: &Path) {
    if !exists(folder).await {
        return;
    }
    match tokio::fs::remove_dir_all(folder).await {
        Ok(()) => info!("Removed partial output {}", folder.display()),
        Err(e) => warn!("Failed to remove partial output {}: {}", folder.display(), e),
    }
}
