//! Transcript export adapters

mod file_exporter;

pub use file_exporter::FileTranscriptExporter;
