//! Records submitted from the add forms of the module pages.

use crate::data::models::{CropStatus, HealthStatus, NextAction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewCrop {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(range(min = 1))]
    pub parcels: u32,
    /// Hectares
    #[validate(range(exclusive_min = 0.0))]
    pub area: f64,
    pub status: CropStatus,
    /// Tonnes per hectare
    #[validate(range(exclusive_min = 0.0))]
    pub yield_estimate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewLivestockGroup {
    #[validate(length(min = 2))]
    pub animal_type: String,
    #[validate(range(min = 1))]
    pub count: u32,
    pub health_status: HealthStatus,
    #[validate(nested)]
    #[serde(default)]
    pub next_action: Option<NextAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewFinancingOpportunity {
    #[validate(length(min = 2))]
    pub title: String,
    #[validate(length(min = 2))]
    pub provider: String,
    /// Display amount, e.g. "750.000 FCFA"
    #[validate(length(min = 1))]
    pub amount: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}
