//! Batch orchestration: convert every PDF in a directory, one at a time.
//!
//! Documents are processed strictly sequentially in directory-listing order;
//! one document's conversion (including cleanup on failure) finishes before
//! the next begins, so no two attempts ever touch the output tree at once.
//! A failed document never stops the run. Only a missing input directory,
//! an unusable output root, or bad configuration abort it.

use crate::config::BatchConfig;
use crate::convert::convert_document;
use crate::error::BatchError;
use crate::output::RunStats;
use crate::pipeline::exec::{CommandRunner, ProcessRunner};
use crate::pipeline::scan;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert every PDF directly inside `input_dir` into `output_dir`.
///
/// The converter's output is forwarded live to this process's stdout and
/// stderr.
///
/// # Returns
/// `Ok(RunStats)` once every candidate was attempted, even if some failed
/// (check `stats.failed`).
///
/// # Errors
/// Returns `Err(BatchError)` only for fatal errors:
/// - Input directory missing or unreadable
/// - Output directory cannot be created
pub async fn convert_dir(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<RunStats, BatchError> {
    convert_dir_with(input_dir, output_dir, config, &ProcessRunner::console()).await
}

/// [`convert_dir`] with a caller-supplied [`CommandRunner`].
pub async fn convert_dir_with(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &BatchConfig,
    runner: &dyn CommandRunner,
) -> Result<RunStats, BatchError> {
    let total_start = Instant::now();

    // ── Step 1: Resolve directories ──────────────────────────────────────
    let input_dir = scan::absolute(input_dir.as_ref())?;
    let output_dir = scan::absolute(output_dir.as_ref())?;

    // Follows symlinks; a regular file is not a usable input directory.
    let input_is_dir = tokio::fs::metadata(&input_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !input_is_dir {
        return Err(BatchError::InputDirNotFound { path: input_dir });
    }

    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| BatchError::OutputDirCreateFailed {
            path: output_dir.clone(),
            source: e,
        })?;

    // ── Step 2: List candidates ──────────────────────────────────────────
    let documents = scan::list_documents(&input_dir).await?;
    let total = documents.len();
    info!("Found {} PDF files in {}", total, input_dir.display());
    debug!("Writing output to {}", output_dir.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 3: Convert sequentially ─────────────────────────────────────
    let mut stats = RunStats::default();
    for (i, doc) in documents.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(&doc.key, i + 1, total);
        }

        let outcome = convert_document(doc, &output_dir, config, runner).await;
        stats.record(outcome);

        if let Some(ref cb) = config.progress_callback {
            cb.on_document_complete(&doc.key, outcome);
        }
    }

    // ── Step 4: Report ───────────────────────────────────────────────────
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!("Batch complete: {} ({}ms total)", stats, stats.total_duration_ms);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(&stats);
    }

    Ok(stats)
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a single-threaded tokio runtime internally.
pub fn convert_dir_sync(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<RunStats, BatchError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_dir(input_dir, output_dir, config))
}
