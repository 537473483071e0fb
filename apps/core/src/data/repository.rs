use crate::data::inputs::{NewCrop, NewFinancingOpportunity, NewLivestockGroup};
use crate::data::models::{
    CropData, DashboardStats, DocumentItem, FinancingOpportunity, FinancingStatus, LivestockGroup,
    RecentActivity,
};
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;
use validator::Validate;

const SEED_DATA: &str = include_str!("seed.json");

/// Data access for the dashboard and module pages.
///
/// Presentation code only depends on this trait, so the fixture backend can
/// be swapped for a real one without touching the views.
#[async_trait]
pub trait DataRepository: Send + Sync + 'static {
    async fn dashboard_stats(&self) -> Result<DashboardStats, AppError>;
    async fn recent_activity(&self) -> Result<Vec<RecentActivity>, AppError>;
    async fn crops(&self) -> Result<Vec<CropData>, AppError>;
    async fn livestock(&self) -> Result<Vec<LivestockGroup>, AppError>;
    async fn financing_opportunities(&self) -> Result<Vec<FinancingOpportunity>, AppError>;
    async fn documents(&self) -> Result<Vec<DocumentItem>, AppError>;

    /// Validates and stores a new crop. Its health is not yet assessed (0).
    async fn add_crop(&self, input: NewCrop) -> Result<CropData, AppError>;
    async fn add_livestock_group(&self, input: NewLivestockGroup) -> Result<LivestockGroup, AppError>;
    /// Validates and stores a new opportunity, open and not yet scored.
    async fn add_financing_opportunity(
        &self,
        input: NewFinancingOpportunity,
    ) -> Result<FinancingOpportunity, AppError>;
}

#[derive(Debug, Clone, Deserialize)]
struct Fixtures {
    dashboard_stats: DashboardStats,
    recent_activity: Vec<RecentActivity>,
    crops: Vec<CropData>,
    livestock: Vec<LivestockGroup>,
    financing_opportunities: Vec<FinancingOpportunity>,
    documents: Vec<DocumentItem>,
}

/// In-memory data seeded from JSON. Added records live as long as the
/// repository.
#[derive(Debug)]
pub struct FixtureRepository {
    data: RwLock<Fixtures>,
}

impl FixtureRepository {
    /// Loads the seed data bundled with the crate.
    pub fn from_seed() -> Result<Self, AppError> {
        Self::from_json(SEED_DATA)
    }

    /// Loads fixtures from a JSON document with the same layout as the seed.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let fixtures: Fixtures = serde_json::from_str(json)?;
        info!(
            "Fixture repository loaded: {} crops, {} livestock groups, {} financing opportunities, {} documents",
            fixtures.crops.len(),
            fixtures.livestock.len(),
            fixtures.financing_opportunities.len(),
            fixtures.documents.len()
        );
        Ok(Self {
            data: RwLock::new(fixtures),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Fixtures>, AppError> {
        self.data
            .read()
            .map_err(|_| AppError::Internal("Fixture lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Fixtures>, AppError> {
        self.data
            .write()
            .map_err(|_| AppError::Internal("Fixture lock poisoned".to_string()))
    }
}

/// Next identifier after the largest numeric one in use.
fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (max + 1).to_string()
}

fn check<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid record: {}", e)))
}

#[async_trait]
impl DataRepository for FixtureRepository {
    async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        Ok(self.read()?.dashboard_stats.clone())
    }

    async fn recent_activity(&self) -> Result<Vec<RecentActivity>, AppError> {
        Ok(self.read()?.recent_activity.clone())
    }

    async fn crops(&self) -> Result<Vec<CropData>, AppError> {
        Ok(self.read()?.crops.clone())
    }

    async fn livestock(&self) -> Result<Vec<LivestockGroup>, AppError> {
        Ok(self.read()?.livestock.clone())
    }

    async fn financing_opportunities(&self) -> Result<Vec<FinancingOpportunity>, AppError> {
        Ok(self.read()?.financing_opportunities.clone())
    }

    async fn documents(&self) -> Result<Vec<DocumentItem>, AppError> {
        Ok(self.read()?.documents.clone())
    }

    async fn add_crop(&self, input: NewCrop) -> Result<CropData, AppError> {
        check(&input)?;
        let mut data = self.write()?;
        let crop = CropData {
            id: next_id(data.crops.iter().map(|c| c.id.as_str())),
            name: input.name,
            parcels: input.parcels,
            area: input.area,
            status: input.status,
            yield_estimate: input.yield_estimate,
            health_score: 0,
        };
        data.crops.push(crop.clone());
        info!("Crop {} added ({})", crop.name, crop.id);
        Ok(crop)
    }

    async fn add_livestock_group(&self, input: NewLivestockGroup) -> Result<LivestockGroup, AppError> {
        check(&input)?;
        let mut data = self.write()?;
        let group = LivestockGroup {
            id: next_id(data.livestock.iter().map(|g| g.id.as_str())),
            animal_type: input.animal_type,
            count: input.count,
            health_status: input.health_status,
            next_action: input.next_action,
        };
        data.livestock.push(group.clone());
        info!("Livestock group {} added ({})", group.animal_type, group.id);
        Ok(group)
    }

    async fn add_financing_opportunity(
        &self,
        input: NewFinancingOpportunity,
    ) -> Result<FinancingOpportunity, AppError> {
        check(&input)?;
        let mut data = self.write()?;
        let opportunity = FinancingOpportunity {
            id: next_id(data.financing_opportunities.iter().map(|o| o.id.as_str())),
            title: input.title,
            provider: input.provider,
            amount: input.amount,
            eligibility: 0,
            deadline: input.deadline,
            status: FinancingStatus::Open,
            description: input.description,
        };
        data.financing_opportunities.push(opportunity.clone());
        info!("Financing opportunity {} added ({})", opportunity.title, opportunity.id);
        Ok(opportunity)
    }
}
