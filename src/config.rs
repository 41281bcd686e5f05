//! Configuration types for batch conversion.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`] or loaded from the environment with
//! [`BatchConfig::from_env`]. The content-server address lives here and is
//! handed to the rewriter explicitly; nothing reads it from global state.

use crate::error::BatchError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default external converter binary.
pub const DEFAULT_CONVERTER: &str = "marker_single";

/// Name of the sentinel file written by [`CompletionMarker::Sentinel`].
pub const SENTINEL_FILE: &str = ".complete";

/// Environment variables read by [`BatchConfig::from_env`].
pub const ENV_CONVERTER: &str = "PDF2MD_CONVERTER";
pub const ENV_CONTENT_HOST: &str = "PDF2MD_CONTENT_HOST";
pub const ENV_CONTENT_PORT: &str = "PDF2MD_CONTENT_PORT";
pub const ENV_COMPLETION_MARKER: &str = "PDF2MD_COMPLETION_MARKER";

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use pdf2md_batch::{BatchConfig, CompletionMarker};
///
/// let config = BatchConfig::builder()
///     .converter_program("marker_single")
///     .content_server("localhost", 3000)
///     .completion_marker(CompletionMarker::Sentinel)
///     .build()
///     .unwrap();
/// assert_eq!(config.content_server.base_url(), "http://localhost:3000");
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// External PDF-to-Markdown converter, resolved through `PATH`.
    /// Default: `marker_single`.
    pub converter_program: String,

    /// Where the rewritten image URLs point.
    pub content_server: ContentServer,

    /// How a finished output folder is recognised. Default: folder existence.
    pub completion_marker: CompletionMarker,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            converter_program: DEFAULT_CONVERTER.to_string(),
            content_server: ContentServer::default(),
            completion_marker: CompletionMarker::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("converter_program", &self.converter_program)
            .field("content_server", &self.content_server)
            .field("completion_marker", &self.completion_marker)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overridden by `PDF2MD_*` environment variables.
    pub fn from_env() -> Result<Self, BatchError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`BatchConfig::from_env`], reading variables through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(program) = get(ENV_CONVERTER) {
            builder = builder.converter_program(program);
        }

        let mut server = ContentServer::default();
        if let Some(host) = get(ENV_CONTENT_HOST) {
            server.host = host;
        }
        if let Some(port) = get(ENV_CONTENT_PORT) {
            server.port = port.trim().parse().map_err(|_| {
                BatchError::InvalidConfig(format!(
                    "{ENV_CONTENT_PORT} must be a port number, got '{port}'"
                ))
            })?;
        }
        builder = builder.content_server(server.host, server.port);

        if let Some(marker) = get(ENV_COMPLETION_MARKER) {
            builder = builder.completion_marker(marker.parse()?);
        }

        builder.build()
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn converter_program(mut self, program: impl Into<String>) -> Self {
        self.config.converter_program = program.into();
        self
    }

    pub fn content_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.content_server = ContentServer {
            host: host.into(),
            port,
        };
        self
    }

    pub fn completion_marker(mut self, marker: CompletionMarker) -> Self {
        self.config.completion_marker = marker;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.converter_program.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        if c.content_server.host.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "Content server host must not be empty".into(),
            ));
        }
        if c.content_server.port == 0 {
            return Err(BatchError::InvalidConfig(
                "Content server port must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Value types ──────────────────────────────────────────────────────────

/// Address of the static content server that serves the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentServer {
    pub host: String,
    pub port: u16,
}

impl Default for ContentServer {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
        }
    }
}

impl ContentServer {
    /// `http://<host>:<port>`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// How the converter decides that a document's output is already complete.
///
/// | Marker | Complete when | Folder without marker |
/// |--------|---------------|-----------------------|
/// | `FolderExists` | output folder exists | n/a |
/// | `Sentinel` | folder contains `.complete` | removed and converted again |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionMarker {
    /// The folder's existence alone marks completion. (default)
    #[default]
    FolderExists,
    /// A `.complete` file written after post-processing marks completion.
    Sentinel,
}

impl std::str::FromStr for CompletionMarker {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "folder" | "folder-exists" => Ok(CompletionMarker::FolderExists),
            "sentinel" | "complete" => Ok(CompletionMarker::Sentinel),
            other => Err(BatchError::InvalidConfig(format!(
                "{ENV_COMPLETION_MARKER} must be 'folder' or 'sentinel', got '{other}'"
            ))),
        }
    }
}
