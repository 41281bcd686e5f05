//! Error types for the pdf2md-batch library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the run cannot proceed at all (missing
//!   input directory, unusable output root, bad configuration). Returned as
//!   `Err(BatchError)` from the top-level `convert_dir*` functions.
//!
//! * [`ExecError`] — **Per-document**: the external converter could not be
//!   launched or supervised. The single-document converter downgrades it to
//!   a [`crate::output::ConversionOutcome::Failed`]; it never escapes the
//!   batch loop.
//!
//! * [`RewriteError`] — **Best-effort**: post-processing a Markdown file
//!   failed. Logged, never changes the recorded outcome.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2md-batch library.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory does not exist.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is a directory.")]
    InputDirNotFound { path: PathBuf },

    /// The input directory exists but could not be listed.
    #[error("Failed to list input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output root could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A hard failure of the process executor, distinct from a nonzero exit.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started (binary missing, permission denied).
    #[error("Failed to launch '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child to exit failed.
    #[error("Failed to wait for '{program}': {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal failure while rewriting image references.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Failed to read Markdown file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write Markdown file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document's output folder could not be listed.
    #[error("Failed to scan output folder '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
