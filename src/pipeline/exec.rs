//! Process execution: run the external converter and forward its output live.
//!
//! The child is launched directly (no shell), so arguments such as file
//! names containing `;` or `$(...)` reach it verbatim. Both output pipes are
//! drained concurrently with `child.wait()`; every chunk read is handed to an
//! [`OutputSink`] immediately, never accumulated.
//!
//! Three results are possible:
//!
//! | Child | Result |
//! |-------|--------|
//! | exits 0 | `Ok(true)` |
//! | exits nonzero / killed by a signal | `Ok(false)` (logged) |
//! | cannot be started | `Err(ExecError::LaunchFailed)` |
//!
//! No timeout is enforced: a hung converter blocks the caller indefinitely.

use crate::error::ExecError;
use futures::future::{BoxFuture, FutureExt};
use std::ffi::OsString;
use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 8 * 1024;

/// Which of the child's streams a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Destination for a child's output chunks.
///
/// Called once per chunk, in the order chunks are read from each pipe.
pub trait OutputSink: Send + Sync {
    fn write_chunk(&self, stream: OutputStream, chunk: &[u8]);
}

/// Forwards chunks to this process's own stdout/stderr, flushing each one.
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_chunk(&self, stream: OutputStream, chunk: &[u8]) {
        // Console write errors (closed pipe etc.) must not fail the conversion.
        let _ = match stream {
            OutputStream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(chunk).and_then(|_| out.flush())
            }
            OutputStream::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(chunk).and_then(|_| err.flush())
            }
        };
    }
}

/// Something that can run a command to completion.
///
/// Object-safe so the orchestrator can hold an `Arc<dyn CommandRunner>`;
/// [`ProcessRunner`] is the production implementation.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, resolving to the success flag.
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [OsString],
    ) -> BoxFuture<'a, Result<bool, ExecError>>;
}

/// Runs commands as child processes, forwarding output to a sink.
#[derive(Clone)]
pub struct ProcessRunner {
    sink: Arc<dyn OutputSink>,
}

impl ProcessRunner {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }

    /// A runner that forwards to the console.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink))
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::console()
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [OsString],
    ) -> BoxFuture<'a, Result<bool, ExecError>> {
        run_command(program, args, self.sink.as_ref()).boxed()
    }
}

/// Launch `program` with `args` and wait for it, streaming output to `sink`.
pub async fn run_command(
    program: &str,
    args: &[OsString],
    sink: &dyn OutputSink,
) -> Result<bool, ExecError> {
    debug!("Launching {} {:?}", program, args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExecError::LaunchFailed {
            program: program.to_string(),
            source: e,
        })?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let stdout_task = async {
        match stdout_pipe {
            Some(pipe) => forward(pipe, OutputStream::Stdout, sink).await,
            None => Ok(()),
        }
    };
    let stderr_task = async {
        match stderr_pipe {
            Some(pipe) => forward(pipe, OutputStream::Stderr, sink).await,
            None => Ok(()),
        }
    };

    let (stdout_res, stderr_res, status) = tokio::join!(stdout_task, stderr_task, child.wait());

    for (name, res) in [("stdout", stdout_res), ("stderr", stderr_res)] {
        if let Err(e) = res {
            warn!("Lost {} of '{}': {}", name, program, e);
        }
    }

    let status = status.map_err(|e| ExecError::WaitFailed {
        program: program.to_string(),
        source: e,
    })?;

    if status.success() {
        return Ok(true);
    }

    match status.code() {
        Some(code) => warn!("'{}' exited with code {}", program, code),
        None => warn!("'{}' was terminated by a signal", program),
    }
    Ok(false)
}

/// Copy `reader` to `sink` chunk by chunk until EOF.
async fn forward<R>(mut reader: R, stream: OutputStream, sink: &dyn OutputSink) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        sink.write_chunk(stream, &buf[..n]);
    }
}
