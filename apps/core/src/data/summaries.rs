//! Figures the module pages derive from repository data.

use crate::data::models::{
    CropData, CropStatus, DocumentItem, DocumentKind, FinancingOpportunity, FinancingStatus,
    HealthStatus, LivestockGroup,
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Window ahead of today in which livestock actions are listed.
const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Unknown,
    Good,
    Fair,
    Poor,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => HealthBand::Unknown,
            s if s > 80 => HealthBand::Good,
            s if s > 60 => HealthBand::Fair,
            _ => HealthBand::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropSummary {
    pub active_count: usize,
    pub total_area: f64,
    pub total_parcels: u32,
    /// `None` when no crop is active.
    pub average_active_health: Option<f64>,
}

impl CropSummary {
    pub fn from_crops(crops: &[CropData]) -> Self {
        let active: Vec<&CropData> = crops
            .iter()
            .filter(|c| c.status == CropStatus::Active)
            .collect();

        let average_active_health = if active.is_empty() {
            None
        } else {
            let sum: u32 = active.iter().map(|c| c.health_score as u32).sum();
            Some(sum as f64 / active.len() as f64)
        };

        Self {
            active_count: active.len(),
            total_area: crops.iter().map(|c| c.area).sum(),
            total_parcels: crops.iter().map(|c| c.parcels).sum(),
            average_active_health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LivestockSummary {
    pub total_animals: u32,
    pub group_count: usize,
    pub healthy_groups: usize,
    /// Rounded share of groups in good health.
    pub healthy_percent: u32,
}

impl LivestockSummary {
    pub fn from_groups(groups: &[LivestockGroup]) -> Self {
        let healthy_groups = groups
            .iter()
            .filter(|g| g.health_status == HealthStatus::Good)
            .count();
        let healthy_percent = if groups.is_empty() {
            0
        } else {
            (healthy_groups as f64 / groups.len() as f64 * 100.0).round() as u32
        };

        Self {
            total_animals: groups.iter().map(|g| g.count).sum(),
            group_count: groups.len(),
            healthy_groups,
            healthy_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAction {
    pub group_id: String,
    pub animal_type: String,
    pub action: String,
    pub date: NaiveDate,
    /// Due today or overdue.
    pub is_urgent: bool,
}

/// Next actions due within a week of `today`, overdue ones included.
pub fn upcoming_actions(groups: &[LivestockGroup], today: NaiveDate) -> Vec<ScheduledAction> {
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
    groups
        .iter()
        .filter_map(|group| {
            let next = group.next_action.as_ref()?;
            (next.date <= horizon).then(|| ScheduledAction {
                group_id: group.id.clone(),
                animal_type: group.animal_type.clone(),
                action: next.kind.clone(),
                date: next.date,
                is_urgent: next.date <= today,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancingSummary {
    /// Sum of received amounts, in FCFA.
    pub total_received: u64,
    pub pending_count: usize,
    pub open_count: usize,
}

impl FinancingSummary {
    pub fn from_opportunities(opportunities: &[FinancingOpportunity]) -> Self {
        Self {
            total_received: opportunities
                .iter()
                .filter(|o| o.status == FinancingStatus::Received)
                .map(|o| parse_amount(&o.amount))
                .sum(),
            pending_count: opportunities
                .iter()
                .filter(|o| matches!(o.status, FinancingStatus::Open | FinancingStatus::Applied))
                .count(),
            open_count: opportunities
                .iter()
                .filter(|o| o.status == FinancingStatus::Open)
                .count(),
        }
    }
}

/// Keeps the digits of a display amount ("1.200.000 FCFA" -> 1200000).
pub fn parse_amount(amount: &str) -> u64 {
    amount
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Days until a deadline; negative once it has passed.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Document search criteria. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub query: Option<String>,
    pub kinds: Vec<DocumentKind>,
    pub tags: Vec<String>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &DocumentItem) -> bool {
        if let Some(query) = self.query.as_deref().map(str::to_lowercase) {
            if !query.is_empty()
                && !doc.title.to_lowercase().contains(&query)
                && !doc.tags.iter().any(|t| t.to_lowercase().contains(&query))
            {
                return false;
            }
        }

        if !self.kinds.is_empty() && !self.kinds.contains(&doc.kind) {
            return false;
        }

        if !self.tags.is_empty() && !doc.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }

        true
    }

    pub fn apply<'a>(&self, documents: &'a [DocumentItem]) -> Vec<&'a DocumentItem> {
        documents.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Every tag in use, sorted and de-duplicated.
pub fn all_tags(documents: &[DocumentItem]) -> Vec<String> {
    documents
        .iter()
        .flat_map(|d| d.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
