//! # pdf2md-batch
//!
//! Batch-convert a directory of PDF documents into per-document Markdown
//! bundles by driving an external converter (`marker_single` by default),
//! then point the generated image references at a content server.
//!
//! ## Why an orchestrator?
//!
//! The converter handles one PDF per invocation and can take minutes per
//! document. Large collections need something that walks the input
//! directory, skips what is already done, shows the converter's progress as
//! it happens, and leaves no half-written output behind when a conversion
//! fails, so an interrupted or partially failed run can simply be started
//! again.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Scan      list *.pdf (case-insensitive) in directory-listing order
//!  ├─ 2. Check     output folder present → Skipped
//!  ├─ 3. Convert   <converter> <pdf> --output_dir <root>, output streamed live
//!  ├─ 4. Cleanup   nonzero exit / launch failure → remove partial folder
//!  ├─ 5. Rewrite   _page…jpeg → http://host:port/<key>/_page…jpeg
//!  └─ 6. Report    Succeeded / Skipped / Failed counts
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2md_batch::{convert_dir, BatchConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .content_server("localhost", 3000)
//!         .build()?;
//!     let stats = convert_dir("pdfs", "out", &config).await?;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md-batch` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_dir, convert_dir_sync, convert_dir_with};
pub use config::{BatchConfig, BatchConfigBuilder, CompletionMarker, ContentServer};
pub use convert::convert_document;
pub use error::{BatchError, ExecError, RewriteError};
pub use output::{ConversionOutcome, Document, DocumentKey, RunStats};
pub use pipeline::exec::{CommandRunner, ConsoleSink, OutputSink, OutputStream, ProcessRunner};
pub use pipeline::rewrite::rewrite_image_refs;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
