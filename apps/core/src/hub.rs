use crate::actors::analysis::AnalysisActorHandle;
use crate::actors::assistant::AssistantActorHandle;
use crate::actors::traits::DecisionAssistant;
use crate::actors::upload::UploadActorHandle;
use crate::blob_store::BlobStore;
use crate::config::{HubConfig, UploaderConfig};
use crate::data::models::{CropData, FinancingOpportunity, LivestockGroup};
use crate::data::{
    DataRepository, FixtureRepository, NewCrop, NewFinancingOpportunity, NewLivestockGroup,
};
use crate::error::AppError;
use crate::integration::{self, AnalysisView, ModuleRoute};
use crate::models::{AnalysisResult, AssistantReply, UploadedFile};
use crate::notify::{Notifier, Toast};
use crate::orchestrator::UploadOrchestrator;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// A browsing session of the data hub.
///
/// Owns the simulators and the session-scoped blobs. Dropping the hub stops
/// every actor and releases every object URL. Must be created inside a
/// Tokio runtime.
pub struct DataHub {
    config: HubConfig,
    blobs: BlobStore,
    uploader: Arc<UploadActorHandle>,
    analyzer: Arc<AnalysisActorHandle>,
    assistant: Arc<AssistantActorHandle>,
    repository: Arc<dyn DataRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DataHub {
    pub fn new(
        config: HubConfig,
        repository: Arc<dyn DataRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let blobs = BlobStore::new();
        let uploader = Arc::new(UploadActorHandle::new(config.simulation.clone(), blobs.clone()));
        let analyzer = Arc::new(AnalysisActorHandle::new(config.simulation.clone()));
        let assistant = Arc::new(AssistantActorHandle::new(config.simulation.assistant_latency));

        info!(
            "Data hub ready (max {} MB, {} allowed types, analysis {:?})",
            config.uploader.max_size_mb,
            config.uploader.allowed_types.len(),
            config.simulation.analysis_mode
        );

        Ok(Self {
            config,
            blobs,
            uploader,
            analyzer,
            assistant,
            repository,
            notifier,
        })
    }

    /// Hub backed by the bundled seed data.
    pub fn with_fixtures(config: HubConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let repository = Arc::new(FixtureRepository::from_seed()?);
        Self::new(config, repository, notifier)
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn repository(&self) -> Arc<dyn DataRepository> {
        self.repository.clone()
    }

    /// A fresh orchestrator with the hub's uploader settings.
    pub fn uploader(&self) -> UploadOrchestrator<UploadActorHandle> {
        UploadOrchestrator::new(
            self.config.uploader.clone(),
            self.uploader.clone(),
            self.notifier.clone(),
        )
    }

    /// A fresh orchestrator with page-specific settings.
    pub fn uploader_with(
        &self,
        config: UploaderConfig,
    ) -> Result<UploadOrchestrator<UploadActorHandle>, AppError> {
        config.validate()?;
        Ok(UploadOrchestrator::new(
            config,
            self.uploader.clone(),
            self.notifier.clone(),
        ))
    }

    #[instrument(skip(self, file), fields(upload_id = %file.id))]
    pub async fn analyze(&self, file: &UploadedFile) -> AnalysisView {
        integration::load_analysis(self.analyzer.as_ref(), self.notifier.as_ref(), file).await
    }

    pub fn integrate(&self, file: &UploadedFile, analysis: &AnalysisResult) -> ModuleRoute {
        integration::integrate(self.notifier.as_ref(), file, analysis)
    }

    /// Asks the decision-support assistant.
    pub async fn ask(&self, message: impl Into<String>) -> Result<AssistantReply, AppError> {
        self.assistant.ask(message.into()).await
    }

    pub async fn add_crop(&self, input: NewCrop) -> Result<CropData, AppError> {
        let crop = self.repository.add_crop(input).await?;
        self.notifier.notify(Toast::success(
            "Culture ajoutée",
            format!("La culture {} a été ajoutée avec succès.", crop.name),
        ));
        Ok(crop)
    }

    pub async fn add_livestock_group(&self, input: NewLivestockGroup) -> Result<LivestockGroup, AppError> {
        let group = self.repository.add_livestock_group(input).await?;
        self.notifier.notify(Toast::success(
            "Groupe d'animaux ajouté",
            format!("Le groupe de {} a été ajouté avec succès.", group.animal_type),
        ));
        Ok(group)
    }

    pub async fn add_financing_opportunity(
        &self,
        input: NewFinancingOpportunity,
    ) -> Result<FinancingOpportunity, AppError> {
        let opportunity = self.repository.add_financing_opportunity(input).await?;
        self.notifier.notify(Toast::success(
            "Demande de financement ajoutée",
            format!("La demande pour \"{}\" a été ajoutée avec succès.", opportunity.title),
        ));
        Ok(opportunity)
    }
}
