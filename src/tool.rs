//! External tool invocation.
//!
//! The converter and the typesetting compiler are plain subprocesses. Each
//! run is synchronous, but bounded by a timeout: a tool that does not exit
//! in time is killed and reported as [`Error::ToolTimeout`].

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{Error, Result};

/// Default time limit for one tool run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Description of an external command.
///
/// `{input}` and `{output}` in `args` are replaced at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Program to execute
    pub program: String,

    /// Argument template
    pub args: Vec<String>,

    /// Time limit
    pub timeout: Duration,
}

impl ToolSpec {
    /// Create a tool spec with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// ImageMagick, one SVG per page numbered from 1.
    pub fn default_converter() -> Self {
        Self::new("convert").with_args(["-scene", "1", "{input}", "{output}"])
    }

    /// Typst compiler writing `main.pdf` next to `main.typ`.
    pub fn default_compiler() -> Self {
        Self::new("typst").with_args(["compile", "{input}"])
    }

    /// Set the argument template.
    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn expand_args(&self, input: &str, output: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", input).replace("{output}", output))
            .collect()
    }

    /// Run the tool in `dir` and return its combined output.
    pub fn run(&self, dir: &Path, input: &str, output: &str) -> Result<String> {
        let args = self.expand_args(input, output);
        debug!("running {} {:?} in {}", self.program, args, dir.display());

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes off-thread so a chatty tool cannot block on a full pipe.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let start = Instant::now();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if start.elapsed() > self.timeout => {
                    warn!(
                        "{} exceeded {:?}, killing it",
                        self.program, self.timeout
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::ToolTimeout {
                        program: self.program.clone(),
                        seconds: self.timeout.as_secs(),
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        // A descendant holding a pipe open counts against the same time limit.
        let mut combined = String::new();
        for pipe in [stdout, stderr].into_iter().flatten() {
            let remaining = self.timeout.saturating_sub(start.elapsed());
            match pipe.recv_timeout(remaining) {
                Ok(bytes) => combined.push_str(&String::from_utf8_lossy(&bytes)),
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "{} exited but its output stayed open past {:?}",
                        self.program, self.timeout
                    );
                    return Err(Error::ToolTimeout {
                        program: self.program.clone(),
                        seconds: self.timeout.as_secs(),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {}
            }
        }

        if status.success() {
            Ok(combined)
        } else {
            Err(Error::Tool {
                program: self.program.clone(),
                output: combined,
            })
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_args() {
        let spec = ToolSpec::default_converter();
        assert_eq!(
            spec.expand_args("file0.pdf", "file0-%03d.svg"),
            vec!["-scene", "1", "file0.pdf", "file0-%03d.svg"]
        );
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let spec = ToolSpec::new("definitely-not-a-real-program-istdoc");
        let dir = std::env::temp_dir();
        assert!(matches!(spec.run(&dir, "", ""), Err(Error::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_output() {
        let spec = ToolSpec::new("sh").with_args(["-c", "echo {input}; exit 3"]);
        let dir = std::env::temp_dir();
        match spec.run(&dir, "boom", "") {
            Err(Error::Tool { program, output }) => {
                assert_eq!(program, "sh");
                assert!(output.contains("boom"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_tool() {
        let spec = ToolSpec::new("sleep")
            .with_args(["5"])
            .with_timeout(Duration::from_millis(100));
        let dir = std::env::temp_dir();
        assert!(matches!(
            spec.run(&dir, "", ""),
            Err(Error::ToolTimeout { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_inherited_pipe_is_bounded_by_timeout() {
        let spec = ToolSpec::new("sh")
            .with_args(["-c", "sleep 5 & echo started"])
            .with_timeout(Duration::from_millis(300));
        let dir = std::env::temp_dir();
        let start = Instant::now();
        assert!(matches!(
            spec.run(&dir, "", ""),
            Err(Error::ToolTimeout { .. })
        ));
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
