//! Writes session transcripts to timestamped files.

use chatstream_application::{ExportError, ExportFormat, ExportReceipt, TranscriptExporter};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Exports into `dir` as `chat_history_{YYYYmmdd_HHMMSS}.{txt|md}`.
pub struct FileTranscriptExporter {
    dir: PathBuf,
}

impl FileTranscriptExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(format: ExportFormat) -> String {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("chat_history_{}.{}", stamp, format.extension())
    }
}

impl TranscriptExporter for FileTranscriptExporter {
    fn export(
        &self,
        session_id: &str,
        pairs: &[(String, String)],
        format: ExportFormat,
    ) -> Result<ExportReceipt, ExportError> {
        let path = self.dir.join(Self::file_name(format));
        let contents = render(session_id, pairs, format);

        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, contents))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(ExportReceipt {
            path,
            pairs: pairs.len(),
        })
    }
}

fn render(session_id: &str, pairs: &[(String, String)], format: ExportFormat) -> String {
    let mut out = String::new();
    match format {
        ExportFormat::Text => {
            let _ = writeln!(out, "--- session: {}", session_id);
            for (user, assistant) in pairs {
                let _ = writeln!(out, "User: {}", user);
                let _ = writeln!(out, "Assistant: {}\n", assistant);
            }
        }
        ExportFormat::Markdown => {
            let _ = writeln!(out, "# Session {}\n", session_id);
            for (user, assistant) in pairs {
                let _ = writeln!(out, "### User\n\n{}\n", user);
                let _ = writeln!(out, "### Assistant\n\n{}\n", assistant);
            }
        }
    }
    out
}
