//! Per-document and per-run result types.

use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical name of a document: its file name without extension.
///
/// The raw stem names the document's output folder, byte for byte as the
/// converter sees it. The display form (lossy UTF-8) is used in logs and
/// rewritten image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    stem: OsString,
    display: String,
}

impl DocumentKey {
    /// Derive the key from a file path (`/in/report.pdf` → `report`).
    ///
    /// Returns `None` for paths without a file name (e.g. `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem().map(|stem| Self {
            display: stem.to_string_lossy().into_owned(),
            stem: stem.to_os_string(),
        })
    }

    /// Display form; invalid UTF-8 is replaced with `U+FFFD`.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The exact file stem, used to build paths.
    pub fn as_os_str(&self) -> &OsStr {
        &self.stem
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// One input PDF, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Absolute path of the input file.
    pub path: PathBuf,
    pub key: DocumentKey,
}

impl Document {
    pub fn new(path: PathBuf) -> Option<Self> {
        let key = DocumentKey::from_path(&path)?;
        Some(Self { path, key })
    }

    /// The folder the external converter creates for this document.
    pub fn output_folder(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.key.as_os_str())
    }
}

/// Terminal state of one document's conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionOutcome {
    /// Output already present; no process was launched.
    Skipped,
    /// Converter exited 0 and the output was post-processed.
    Succeeded,
    /// Converter failed; any partial output was removed.
    Failed,
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionOutcome::Skipped => "skipped",
            ConversionOutcome::Succeeded => "succeeded",
            ConversionOutcome::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Aggregate counts for one run, reported once the batch completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Wall-clock duration of the whole run.
    pub total_duration_ms: u64,
}

impl RunStats {
    pub fn record(&mut self, outcome: ConversionOutcome) {
        match outcome {
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::Succeeded => self.succeeded += 1,
            ConversionOutcome::Failed => self.failed += 1,
        }
    }

    /// Number of documents considered in the run.
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Succeeded: {}, Skipped: {}, Failed: {}",
            self.succeeded, self.skipped, self.failed
        )
    }
}
