//! Plot executor that runs blocks in a Python subprocess.
//!
//! Each block gets a fresh interpreter. The harness below forces the
//! non-interactive `Agg` backend, closes every figure before and after the
//! block, executes it in its own namespace with its prints discarded and
//! writes the current figure to stdout as PNG. The source travels over stdin.

use async_trait::async_trait;
use chatstream_application::{PlotError, PlotExecutor, PlotImage};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Default wall-clock bound on one block.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit code the harness uses when the block drew nothing.
const EXIT_NO_FIGURE: i32 = 3;

const HARNESS: &str = r#"
import contextlib
import io
import sys

import matplotlib
matplotlib.use("Agg")
import matplotlib.pyplot as plt

source = sys.stdin.read()
png_out = sys.stdout.buffer
plt.close("all")
try:
    with contextlib.redirect_stdout(io.StringIO()):
        exec(compile(source, "<plot>", "exec"), {"__name__": "__plot__"})
    if not plt.get_fignums():
        sys.exit(3)
    buffer = io.BytesIO()
    plt.gcf().savefig(buffer, format="png")
    png_out.write(buffer.getvalue())
    png_out.flush()
except Exception as exc:
    sys.stderr.write(f"{type(exc).__name__}: {exc}\n")
    sys.exit(1)
finally:
    plt.close("all")
"#;

pub struct PythonPlotExecutor {
    interpreter: PathBuf,
    timeout: Duration,
}

impl PythonPlotExecutor {
    /// Locate `python` on `PATH` (or accept it as a path).
    pub fn new(python: &str, timeout: Duration) -> Result<Self, PlotError> {
        let interpreter = which::which(python)
            .map_err(|e| PlotError::Launch(format!("{}: {}", python, e)))?;
        debug!("Using Python interpreter {}", interpreter.display());
        Ok(Self::with_interpreter(interpreter, timeout))
    }

    /// Use `interpreter` as-is, without a `PATH` lookup.
    pub fn with_interpreter(interpreter: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    async fn run(&self, source: &str) -> Result<Output, PlotError> {
        let mut child = Command::new(&self.interpreter)
            .arg("-c")
            .arg(HARNESS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PlotError::Launch(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A harness that exits early closes the pipe; its exit status says why.
            let _ = stdin.write_all(source.as_bytes()).await;
        }

        child
            .wait_with_output()
            .await
            .map_err(|e| PlotError::Launch(e.to_string()))
    }
}

#[async_trait]
impl PlotExecutor for PythonPlotExecutor {
    async fn execute(&self, source: &str) -> Result<PlotImage, PlotError> {
        // Dropping the future on expiry drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, self.run(source))
            .await
            .map_err(|_| PlotError::Timeout(self.timeout))??;
        interpret(output.status.code(), output.stdout, &output.stderr)
    }
}

fn interpret(code: Option<i32>, stdout: Vec<u8>, stderr: &[u8]) -> Result<PlotImage, PlotError> {
    match code {
        Some(0) if !stdout.is_empty() => Ok(PlotImage { png: stdout }),
        Some(0) | Some(EXIT_NO_FIGURE) => Err(PlotError::NoFigure),
        Some(_) => Err(PlotError::Execution(describe(stderr))),
        None => Err(PlotError::Execution("interpreter terminated by a signal".into())),
    }
}

/// Last non-empty stderr line: the exception line for harness failures and
/// for tracebacks alike.
fn describe(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("the interpreter exited with an error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_exit_codes() {
        assert_eq!(
            interpret(Some(0), vec![0x89, b'P'], b""),
            Ok(PlotImage {
                png: vec![0x89, b'P']
            })
        );
        assert_eq!(interpret(Some(0), vec![], b""), Err(PlotError::NoFigure));
        assert_eq!(interpret(Some(3), vec![], b""), Err(PlotError::NoFigure));
        assert_eq!(
            interpret(Some(1), vec![], b"ValueError: bad data\n"),
            Err(PlotError::Execution("ValueError: bad data".to_string()))
        );
    }

    #[test]
    fn test_describe_takes_last_traceback_line() {
        let stderr = b"Traceback (most recent call last):\n  File \"<string>\", line 5\nModuleNotFoundError: No module named 'matplotlib'\n\n";
        assert_eq!(
            describe(stderr),
            "ModuleNotFoundError: No module named 'matplotlib'"
        );
        assert_eq!(describe(b""), "the interpreter exited with an error");
    }

    #[test]
    fn test_missing_interpreter_fails_to_launch() {
        let result = PythonPlotExecutor::new("definitely-not-a-python-xyz", DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(PlotError::Launch(_))));
    }

    #[cfg(unix)]
    fn script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-python");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_becomes_image() {
        let dir = tempfile::tempdir().unwrap();
        let fake = script(dir.path(), "cat > /dev/null\nprintf 'PNG'");
        let executor = PythonPlotExecutor::with_interpreter(fake, DEFAULT_TIMEOUT);

        let image = executor.execute("plt.plot([1])").await.unwrap();

        assert_eq!(image.png, b"PNG".to_vec());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let fake = script(dir.path(), "cat > /dev/null\necho 'NameError: x' >&2\nexit 1");
        let executor = PythonPlotExecutor::with_interpreter(fake, DEFAULT_TIMEOUT);

        let result = executor.execute("x").await;

        assert_eq!(result, Err(PlotError::Execution("NameError: x".to_string())));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_block_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let fake = script(dir.path(), "sleep 5");
        let timeout = Duration::from_millis(200);
        let executor = PythonPlotExecutor::with_interpreter(fake, timeout);

        let result = executor.execute("while True: pass").await;

        assert_eq!(result, Err(PlotError::Timeout(timeout)));
    }

    #[cfg(unix)]
    const STUB_PYPLOT: &str = r#"
_figures = []


def plot(*args, **kwargs):
    if not _figures:
        _figures.append(object())


def close(which=None):
    _figures.clear()


def get_fignums():
    return list(range(1, len(_figures) + 1))


class _Figure:
    def savefig(self, fp, format=None):
        fp.write(b"\x89PNG\r\n\x1a\nstub")


def gcf():
    return _Figure()
"#;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_block_prints_do_not_reach_the_image() {
        let Ok(python) = which::which("python3") else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("matplotlib");
        std::fs::create_dir(&stub).unwrap();
        std::fs::write(stub.join("__init__.py"), "def use(backend):\n    pass\n").unwrap();
        std::fs::write(stub.join("pyplot.py"), STUB_PYPLOT).unwrap();
        let wrapper = script(
            dir.path(),
            &format!(
                "PYTHONPATH='{}' exec '{}' \"$@\"",
                dir.path().display(),
                python.display()
            ),
        );
        let executor = PythonPlotExecutor::with_interpreter(wrapper, DEFAULT_TIMEOUT);

        let image = executor
            .execute("import matplotlib.pyplot as plt\nprint('mean = 2.0')\nplt.plot([1])")
            .await
            .unwrap();

        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert_eq!(image.png, b"\x89PNG\r\n\x1a\nstub".to_vec());
    }

    #[tokio::test]
    async fn test_real_matplotlib_when_available() {
        let Ok(executor) = PythonPlotExecutor::new("python3", DEFAULT_TIMEOUT) else {
            return;
        };
        let has_matplotlib = std::process::Command::new(executor.interpreter())
            .args(["-c", "import matplotlib"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !has_matplotlib {
            return;
        }

        let image = executor
            .execute("import matplotlib.pyplot as plt\nprint('plotting')\nplt.plot([1, 2, 3])")
            .await
            .unwrap();
        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));

        let empty = executor.execute("x = 1").await;
        assert_eq!(empty, Err(PlotError::NoFigure));

        let failed = executor.execute("raise ValueError('bad data')").await;
        assert_eq!(
            failed,
            Err(PlotError::Execution("ValueError: bad data".to_string()))
        );
    }
}
