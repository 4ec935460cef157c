use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Terminal failures of a drawing submission.
///
/// The `Display` output is the client-facing detail message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DrawingError {
    /// Payload could not be decoded, parsed, colored or persisted.
    #[error("Invalid Drawing data: {0}")]
    InvalidDrawingData(String),
    /// Decoding finished without producing a usable image.
    #[error("Drawing Cant be extracted")]
    DrawingExtractionFailed,
    /// The analyzer ran but had nothing to report.
    #[error("Error processing Drawing")]
    AnalysisEmptyResult,
    /// The analyzer failed.
    #[error("Error processing Drawing: {0}")]
    AnalysisError(String),
}

impl DrawingError {
    pub fn invalid(err: impl std::fmt::Display) -> Self {
        Self::InvalidDrawingData(err.to_string())
    }

    /// True for failures caused by the submitted payload rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDrawingData(_) | Self::DrawingExtractionFailed
        )
    }
}
