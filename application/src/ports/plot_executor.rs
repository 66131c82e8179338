//! Plot executor port
//!
//! Runs the source of one plotting block and returns the active figure as a
//! PNG. Blocks are untrusted code and run without a sandbox;
//! adapters are expected to bound them with a timeout and to reset all figure
//! state before and after every block.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from executing a plotting block
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// The code raised; carries the interpreter's description.
    #[error("{0}")]
    Execution(String),

    #[error("execution timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("the code did not produce a figure")]
    NoFigure,

    #[error("could not start the interpreter: {0}")]
    Launch(String),
}

/// A rendered figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotImage {
    pub png: Vec<u8>,
}

/// Executes plotting source in an isolated namespace.
#[async_trait]
pub trait PlotExecutor: Send + Sync {
    async fn execute(&self, source: &str) -> Result<PlotImage, PlotError>;
}

/// Executor used when rendering is disabled; every block fails to launch.
pub struct NoPlotExecutor;

#[async_trait]
impl PlotExecutor for NoPlotExecutor {
    async fn execute(&self, _source: &str) -> Result<PlotImage, PlotError> {
        Err(PlotError::Launch("plot rendering is disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            PlotError::Timeout(Duration::from_millis(1500)).to_string(),
            "execution timed out after 1.5s"
        );
    }

    #[tokio::test]
    async fn test_no_plot_executor_refuses() {
        let err = NoPlotExecutor.execute("x = 1").await.unwrap_err();
        assert!(matches!(err, PlotError::Launch(_)));
    }
}
