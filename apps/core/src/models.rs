use crate::classify::file_type::guess_mime_type;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Coarse file category derived from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Excel,
    Pdf,
    Image,
    Other,
}

impl FileType {
    pub fn label(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Excel => "excel",
            FileType::Pdf => "pdf",
            FileType::Image => "image",
            FileType::Other => "other",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Business module an uploaded file is routed to, as guessed from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    Crops,
    Livestock,
    Financing,
    DecisionSupport,
    Documents,
}

impl ModuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleKind::Crops => "crops",
            ModuleKind::Livestock => "livestock",
            ModuleKind::Financing => "financing",
            ModuleKind::DecisionSupport => "decision-support",
            ModuleKind::Documents => "documents",
        }
    }

    /// The analysis archetype that corresponds to this module.
    pub fn archetype(&self) -> AnalysisModule {
        match self {
            ModuleKind::Crops => AnalysisModule::Crops,
            ModuleKind::Livestock => AnalysisModule::Livestock,
            ModuleKind::Financing => AnalysisModule::Financing,
            ModuleKind::DecisionSupport => AnalysisModule::Decision,
            ModuleKind::Documents => AnalysisModule::Documents,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Closed set of analysis archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisModule {
    Crops,
    Livestock,
    Decision,
    Financing,
    Documents,
}

impl AnalysisModule {
    pub const ALL: [AnalysisModule; 5] = [
        AnalysisModule::Crops,
        AnalysisModule::Livestock,
        AnalysisModule::Financing,
        AnalysisModule::Decision,
        AnalysisModule::Documents,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisModule::Crops => "crops",
            AnalysisModule::Livestock => "livestock",
            AnalysisModule::Decision => "decision",
            AnalysisModule::Financing => "financing",
            AnalysisModule::Documents => "documents",
        }
    }

    /// User-facing module name.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisModule::Crops => "Cultures",
            AnalysisModule::Livestock => "Élevage",
            AnalysisModule::Decision => "Aide à la décision",
            AnalysisModule::Financing => "Financement",
            AnalysisModule::Documents => "Documents",
        }
    }

    /// Page the analysed content is integrated into.
    pub fn route(&self) -> &'static str {
        match self {
            AnalysisModule::Crops => "/crops",
            AnalysisModule::Livestock => "/livestock",
            AnalysisModule::Decision => "/decision-support",
            AnalysisModule::Financing => "/financing",
            AnalysisModule::Documents => "/documents",
        }
    }
}

impl fmt::Display for AnalysisModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A file handed to the hub, as the browser would describe it.
#[derive(Clone)]
pub struct SourceFile {
    pub name: String,
    /// Size in bytes as reported by the host.
    pub size: u64,
    /// MIME type as reported by the host (may be empty).
    pub mime_type: String,
    /// Last modification time, epoch milliseconds.
    pub last_modified: i64,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Builds a source file from in-memory content, stamped with the current time.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            last_modified: Utc::now().timestamp_millis(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn with_last_modified(mut self, last_modified: i64) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Reads a file from disk, sniffing its MIME type from content and extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Validation(format!("Invalid file name: {:?}", path)))?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let metadata = tokio::fs::metadata(path).await?;
        let last_modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or_else(|_| Utc::now().timestamp_millis());

        let mime_type = guess_mime_type(&name, &bytes);
        Ok(Self::new(name, mime_type, bytes).with_last_modified(last_modified))
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("mime_type", &self.mime_type)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

/// Record produced by the upload simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Opaque identifier, unique per upload.
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Epoch milliseconds, copied from the source file.
    pub last_modified: i64,
    /// Session-scoped `blob:` URL of the uploaded bytes.
    pub url: Url,
    pub detected_module: ModuleKind,
}

/// A single detected entity value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    Count(u64),
    Text(String),
    List(Vec<String>),
}

impl EntityValue {
    /// Flattens the value into display strings.
    pub fn values(&self) -> Vec<String> {
        match self {
            EntityValue::Count(n) => vec![n.to_string()],
            EntityValue::Text(s) => vec![s.clone()],
            EntityValue::List(items) => items.clone(),
        }
    }
}

/// Result of the simulated AI analysis of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub module_type: AnalysisModule,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    pub summary: String,
    /// Display order is insertion order.
    pub recommendations: Vec<String>,
    pub entities: BTreeMap<String, EntityValue>,
}

/// Subject the assistant recognised in a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantTopic {
    Weather,
    Crops,
    Livestock,
    Financing,
    General,
}

/// One answer of the decision-support assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub id: String,
    pub topic: AssistantTopic,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
