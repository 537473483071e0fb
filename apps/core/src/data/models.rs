use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-module file counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCounts {
    pub crops: u32,
    pub livestock: u32,
    pub financing: u32,
    pub decisions: u32,
    pub documents: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_files: u32,
    pub analyzed_documents: u32,
    pub pending_tasks: u32,
    pub modules: ModuleCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Upload,
    Analysis,
    Recommendation,
    Task,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStatus {
    Active,
    Planned,
    Harvested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    pub id: String,
    pub name: String,
    pub parcels: u32,
    /// Hectares
    pub area: f64,
    pub status: CropStatus,
    /// Tonnes per hectare
    pub yield_estimate: f64,
    /// 0 - 100, 0 when not yet planted
    pub health_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Good,
    Average,
    NeedsAttention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NextAction {
    #[validate(length(min = 1))]
    pub kind: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivestockGroup {
    pub id: String,
    pub animal_type: String,
    pub count: u32,
    pub health_status: HealthStatus,
    #[serde(default)]
    pub next_action: Option<NextAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancingStatus {
    Open,
    Applied,
    Received,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingOpportunity {
    pub id: String,
    pub title: String,
    pub provider: String,
    /// Display amount, e.g. "2.500.000 FCFA"
    pub amount: String,
    /// Eligibility percentage
    pub eligibility: u8,
    pub deadline: NaiveDate,
    pub status: FinancingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Report,
    Certificate,
    Guide,
    Regulation,
    Other,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Report => "Rapports",
            DocumentKind::Certificate => "Certificats",
            DocumentKind::Guide => "Guides",
            DocumentKind::Regulation => "Réglementations",
            DocumentKind::Other => "Autres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: String,
    pub title: String,
    pub kind: DocumentKind,
    pub upload_date: NaiveDate,
    /// Display size, e.g. "3.2 MB"
    pub file_size: String,
    pub tags: Vec<String>,
}
