//! Export History use case
//!
//! Collects a session's completed pairs and hands them to the
//! [`TranscriptExporter`]. The engine supplies data only; naming, placement
//! and format live in the adapter.

use crate::ports::transcript_exporter::{
    ExportError, ExportFormat, ExportReceipt, TranscriptExporter,
};
use chatstream_domain::Session;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ExportHistoryUseCase {
    exporter: Arc<dyn TranscriptExporter>,
}

impl ExportHistoryUseCase {
    pub fn new(exporter: Arc<dyn TranscriptExporter>) -> Self {
        Self { exporter }
    }

    /// Export the completed pairs of `session`.
    ///
    /// An unpaired in-flight user message is never exported.
    pub fn execute(
        &self,
        session: &Session,
        format: ExportFormat,
    ) -> Result<ExportReceipt, ExportError> {
        let pairs: Vec<(String, String)> = session
            .pairs()
            .map(|(user, assistant)| (user.to_string(), assistant.to_string()))
            .collect();

        let receipt = self.exporter.export(session.id(), &pairs, format)?;
        info!(
            session = %session.id(),
            pairs = receipt.pairs,
            path = %receipt.path.display(),
            "Exported history"
        );
        Ok(receipt)
    }
}
