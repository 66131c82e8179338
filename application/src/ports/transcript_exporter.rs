//! Transcript export port
//!
//! The engine hands an exporter the session id and its ordered pairs; file
//! naming, placement and serialization belong to the adapter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Serialization format of an exported transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `User:` / `Assistant:` lines
    #[default]
    Text,
    /// Markdown sections
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors from exporting a transcript
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where an export landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub pairs: usize,
}

impl ExportReceipt {
    /// Human-readable status line for the front-end.
    pub fn status(&self) -> String {
        format!("History has been exported to file {}", self.path.display())
    }
}

/// Port for writing a session transcript somewhere durable.
pub trait TranscriptExporter: Send + Sync {
    fn export(
        &self,
        session_id: &str,
        pairs: &[(String, String)],
        format: ExportFormat,
    ) -> Result<ExportReceipt, ExportError>;
}
