//! Running external command-line tools

use crate::error::LayoutError;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default limit on a single tool invocation
const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Locates executables, optionally inside a fixed directory, and runs them
/// under a deadline
#[derive(Debug, Clone)]
pub(crate) struct ToolRunner {
    bin_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ToolRunner {
    pub(crate) fn new(bin_dir: Option<PathBuf>) -> Self {
        Self {
            bin_dir,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub(crate) fn with_bin_dir(mut self, bin_dir: PathBuf) -> Self {
        self.bin_dir = Some(bin_dir);
        self
    }

    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn program(&self, tool: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(tool),
            None => PathBuf::from(tool),
        }
    }

    /// Run a tool to completion and return its stdout as UTF-8 (lossy).
    ///
    /// A tool still running at the deadline is killed and reported as a
    /// [`LayoutError::Tool`] failure.
    pub(crate) fn run<I, S>(&self, tool: &'static str, args: I) -> Result<String, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.execute(tool, args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LayoutError::Tool {
                tool,
                message: format!("exit {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn execute<I, S>(&self, tool: &'static str, args: I) -> Result<Output, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.program(tool);
        let mut command = Command::new(&program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Running {:?}", command);

        let mut child = command.spawn().map_err(|e| LayoutError::Tool {
            tool,
            message: format!("cannot start {}: {}", program.display(), e),
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self
            .wait(&mut child)
            .map_err(|message| LayoutError::Tool { tool, message })?;
        let Some(status) = status else {
            warn!("{} still running after {:?}; killed", tool, self.timeout);
            return Err(LayoutError::Tool {
                tool,
                message: format!("timed out after {}s", self.timeout.as_secs_f64()),
            });
        };

        Ok(Output {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }

    /// Wait until the child exits or the deadline passes; `None` means it was killed
    fn wait(&self, child: &mut Child) -> Result<Option<ExitStatus>, String> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(|e| format!("wait failed: {}", e))? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                // kill fails only if the child already exited
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Whether a tool starts and exits in time; some tools exit non-zero on `-v`
    pub(crate) fn available(&self, tool: &'static str, version_flag: &str) -> bool {
        self.execute(tool, [version_flag]).is_ok()
    }
}

/// Read a pipe to its end on a helper thread so the child never blocks on a full pipe
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Path argument as a string, rejecting non-UTF-8 paths up front
pub(crate) fn path_arg(path: &Path) -> Result<&str, LayoutError> {
    path.to_str().ok_or_else(|| LayoutError::Unreadable {
        path: path.to_path_buf(),
        reason: "path is not valid UTF-8".to_string(),
    })
}
