use crate::models::{AnalysisResult, AssistantReply, ModuleKind, SourceFile, UploadedFile};
use serde::Serialize;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The upload simulator failed to process a file.
    #[error("Upload failed: {0}")]
    Upload(String),
    /// The analysis simulator failed to produce a result.
    #[error("Analysis failed: {0}")]
    Analysis(String),
    /// A generic internal error within an actor (closed channel, dropped responder).
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the upload actor.
#[derive(Debug)]
pub enum UploadMessage {
    /// Classify, detect and store one file.
    Upload {
        file: SourceFile,
        /// A channel to send the resulting upload record back.
        responder: oneshot::Sender<Result<UploadedFile, AppError>>,
    },
}

/// Messages that can be sent to the analysis actor.
#[derive(Debug)]
pub enum AnalysisMessage {
    /// Produce the canned analysis for a previously uploaded file.
    Analyze {
        upload_id: String,
        /// Module detected when the file was uploaded.
        detected_module: ModuleKind,
        /// `Ok(None)` means no analysis is available for this upload.
        responder: oneshot::Sender<Result<Option<AnalysisResult>, AppError>>,
    },
}

/// Messages that can be sent to the decision-support assistant.
#[derive(Debug)]
pub enum AssistantMessage {
    /// Answer one user question.
    Ask {
        message: String,
        responder: oneshot::Sender<Result<AssistantReply, AppError>>,
    },
}
