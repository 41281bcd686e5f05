//! CLI binary for pdf2md-batch.
//!
//! A thin shim over the library crate: two positional arguments, no flags.
//! Converter and content-server settings come from `PDF2MD_*` environment
//! variables (see [`pdf2md_batch::config`]).

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use pdf2md_batch::{
    convert_dir, BatchConfig, BatchProgressCallback, ConversionOutcome, DocumentKey, RunStats,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints a header before each document and a result line after it.
///
/// Lines go to stderr so they interleave with, but never corrupt, the
/// converter output forwarded on stdout.
struct CliProgressCallback;

impl BatchProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_documents: usize) {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_documents} PDF files"))
        );
    }

    fn on_document_start(&self, key: &DocumentKey, index: usize, total: usize) {
        eprintln!("{} {}", dim(&format!("[{index:>3}/{total:<3}]")), bold(key.as_str()));
    }

    fn on_document_complete(&self, key: &DocumentKey, outcome: ConversionOutcome) {
        let mark = match outcome {
            ConversionOutcome::Succeeded => green("✓"),
            ConversionOutcome::Skipped => dim("↷"),
            ConversionOutcome::Failed => red("✗"),
        };
        eprintln!("  {} {}  {}", mark, key, dim(&outcome.to_string()));
    }

    fn on_run_complete(&self, stats: &RunStats) {
        let mark = if stats.failed == 0 {
            green("✔")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{}  {}  {}",
            mark,
            bold(&stats.to_string()),
            dim(&format!("{}ms", stats.total_duration_ms)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert everything in ./pdfs into ./out
  pdf2md-batch ./pdfs ./out

  # Re-run after an interruption: finished documents are skipped
  pdf2md-batch ./pdfs ./out

ENVIRONMENT VARIABLES:
  PDF2MD_CONVERTER          Converter binary (default: marker_single)
  PDF2MD_CONTENT_HOST       Content server host for image URLs (default: localhost)
  PDF2MD_CONTENT_PORT       Content server port for image URLs (default: 3000)
  PDF2MD_COMPLETION_MARKER  folder (default) or sentinel (.complete file marks done)
  RUST_LOG                  Log filter (default: info)

EXIT STATUS:
  0  run completed, even if some documents failed
  1  missing arguments, missing input directory, or invalid configuration
"#;

/// Batch-convert a directory of PDFs to Markdown bundles.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-batch",
    version,
    about = "Batch-convert a directory of PDFs to Markdown bundles",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDF files to convert.
    input_dir: PathBuf,

    /// Directory receiving one output folder per document.
    output_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            eprintln!("Usage: pdf2md-batch <INPUT_DIR> <OUTPUT_DIR>");
            std::process::exit(1);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut config = BatchConfig::from_env().context("Invalid configuration")?;
    config.progress_callback = Some(Arc::new(CliProgressCallback));

    // ── Run ──────────────────────────────────────────────────────────────
    convert_dir(&cli.input_dir, &cli.output_dir, &config)
        .await
        .context("Batch conversion aborted")?;

    Ok(())
}
