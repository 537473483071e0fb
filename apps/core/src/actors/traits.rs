use crate::actors::messages::AppError;
use crate::models::{AnalysisResult, AssistantReply, SourceFile, UploadedFile};
use async_trait::async_trait;

/// Defines the public interface for the upload simulator.
///
/// The orchestrator only talks to this trait, so tests can substitute a
/// scripted implementation and a real backend can replace the simulation.
#[async_trait]
pub trait UploadSimulator: Send + Sync + 'static {
    /// Turns one source file into an upload record.
    async fn upload(&self, file: SourceFile) -> Result<UploadedFile, AppError>;
}

/// Defines the public interface for the analysis simulator.
#[async_trait]
pub trait AnalysisSimulator: Send + Sync + 'static {
    /// Returns the analysis for an upload, or `None` when none can be produced.
    async fn analyze(&self, file: &UploadedFile) -> Result<Option<AnalysisResult>, AppError>;
}

/// Defines the public interface for the decision-support assistant.
#[async_trait]
pub trait DecisionAssistant: Send + Sync + 'static {
    /// Answers a free-text question about the farm.
    async fn ask(&self, message: String) -> Result<AssistantReply, AppError>;
}
