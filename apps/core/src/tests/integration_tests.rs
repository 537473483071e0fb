//! Integration Tests
//!
//! Full upload → analysis → module routing workflows through `DataHub`, plus
//! the add forms and the assistant.

use crate::config::{HubConfig, SimulationConfig, UploaderConfig};
use crate::data::inputs::{NewCrop, NewFinancingOpportunity, NewLivestockGroup};
use crate::data::models::{CropStatus, HealthStatus};
use crate::error::AppError;
use crate::actors::traits::AnalysisSimulator;
use crate::hub::DataHub;
use crate::integration::{load_analysis, AnalysisView, ANALYSIS_UNAVAILABLE_MESSAGE};
use crate::models::{AnalysisResult, AnalysisModule, AssistantTopic, FileType, ModuleKind, SourceFile, UploadedFile};
use crate::notify::{ChannelNotifier, Toast};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn fast_config() -> HubConfig {
    HubConfig {
        uploader: UploaderConfig {
            multiple: true,
            progress_tick: Duration::from_millis(5),
            reset_delay: Duration::from_millis(5),
            ..UploaderConfig::default()
        },
        simulation: SimulationConfig {
            upload_latency: Duration::from_millis(10),
            analysis_latency: Duration::from_millis(10),
            assistant_latency: Duration::from_millis(10),
            ..SimulationConfig::default()
        },
    }
}

fn hub(config: HubConfig) -> (DataHub, UnboundedReceiver<Toast>) {
    let (notifier, toasts) = ChannelNotifier::new();
    let hub = DataHub::with_fixtures(config, Arc::new(notifier)).expect("hub");
    (hub, toasts)
}

fn drain(toasts: &mut UnboundedReceiver<Toast>) -> Vec<Toast> {
    let mut out = Vec::new();
    while let Ok(toast) = toasts.try_recv() {
        out.push(toast);
    }
    out
}

async fn upload_all(hub: &DataHub, files: Vec<SourceFile>) -> Vec<UploadedFile> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let mut uploader = hub
        .uploader()
        .on_file_uploaded(move |f| sink.lock().unwrap().push(f.clone()));
    uploader.process_files(files).await;
    let uploaded = received.lock().unwrap().clone();
    uploaded
}

#[cfg(test)]
mod workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_soil_report_reaches_crops_module() {
        let (hub, mut toasts) = hub(fast_config());
        let source = SourceFile::new("rapport_sol_parcelleB2.csv", "text/csv", vec![b'x'; 2 * 1024 * 1024]);

        let uploaded = upload_all(&hub, vec![source]).await;
        assert_eq!(uploaded.len(), 1);
        let file = &uploaded[0];
        assert_eq!(file.file_type, FileType::Csv);
        assert_eq!(file.detected_module, ModuleKind::Crops);
        assert_eq!(file.size, 2 * 1024 * 1024);
        assert!(hub.blobs().get(&file.url).is_some());

        let upload_toasts = drain(&mut toasts);
        assert_eq!(upload_toasts.len(), 1);
        assert!(upload_toasts[0].description.contains("1 fichier(s)"));

        let view = hub.analyze(file).await;
        let analysis = view.analysis().expect("analysis ready").clone();
        assert_eq!(analysis.module_type, AnalysisModule::Crops);

        let route = hub.integrate(file, &analysis);
        assert_eq!(route.path, "/crops");
        assert_eq!(route.module, AnalysisModule::Crops);

        let integrate_toasts = drain(&mut toasts);
        assert_eq!(integrate_toasts.len(), 1);
        assert_eq!(integrate_toasts[0].title, "Document intégré avec succès");
        assert_eq!(
            integrate_toasts[0].description,
            "\"rapport_sol_parcelleB2.csv\" a été intégré au module Cultures."
        );
    }

    #[tokio::test]
    async fn test_executable_rejected() {
        let (hub, mut toasts) = hub(fast_config());
        let source = SourceFile::new("budget.exe", "application/octet-stream", vec![0u8; 1024 * 1024]);

        let uploaded = upload_all(&hub, vec![source]).await;

        assert!(uploaded.is_empty());
        assert!(hub.blobs().is_empty());
        let toasts = drain(&mut toasts);
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].is_error());
        assert!(toasts[0].description.contains("budget.exe"));
    }

    #[tokio::test]
    async fn test_every_module_routes() {
        let (hub, _toasts) = hub(fast_config());
        let files = vec![
            SourceFile::new("registre_vaccination.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
            SourceFile::new("dossier_subvention.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
            SourceFile::new("conseils_irrigation.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
            SourceFile::new("photo_tracteur.png", "image/png", vec![0x89, b'P', b'N', b'G']),
        ];

        let uploaded = upload_all(&hub, files).await;
        assert_eq!(uploaded.len(), 4);

        let mut paths = Vec::new();
        for file in &uploaded {
            let view = hub.analyze(file).await;
            let analysis = view.analysis().expect("analysis ready");
            assert!((0.0..=1.0).contains(&analysis.confidence));
            assert!(!analysis.recommendations.is_empty());
            paths.push(hub.integrate(file, analysis).path);
        }
        assert_eq!(paths, vec!["/livestock", "/financing", "/decision-support", "/documents"]);
    }

    #[tokio::test]
    async fn test_upload_from_another_session_is_analysed() {
        let (hub, mut toasts) = hub(fast_config());
        let (other_hub, _other_toasts) = super::hub(fast_config());

        let uploaded = upload_all(&other_hub, vec![SourceFile::new("semis.csv", "text/csv", b"a".to_vec())]).await;

        let view = hub.analyze(&uploaded[0]).await;
        let analysis = view.analysis().expect("analysis ready");
        assert_eq!(analysis.module_type, AnalysisModule::Crops);
        assert!(drain(&mut toasts).is_empty());
    }

    struct NoAnalysis;

    #[async_trait::async_trait]
    impl AnalysisSimulator for NoAnalysis {
        async fn analyze(&self, _file: &UploadedFile) -> Result<Option<AnalysisResult>, AppError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_missing_analysis_is_unavailable() {
        let (notifier, mut toasts) = ChannelNotifier::new();
        let file = UploadedFile {
            id: "sans-analyse".to_string(),
            name: "notes.pdf".to_string(),
            size: 1,
            file_type: FileType::Pdf,
            last_modified: 0,
            url: url::Url::parse("blob:agripilot-data-hub/sans-analyse").unwrap(),
            detected_module: ModuleKind::Documents,
        };

        let view = load_analysis(&NoAnalysis, &notifier, &file).await;
        assert_eq!(
            view,
            AnalysisView::Unavailable {
                message: ANALYSIS_UNAVAILABLE_MESSAGE.to_string()
            }
        );
        assert!(drain(&mut toasts).is_empty());
    }

    #[tokio::test]
    async fn test_analysis_failure_notifies() {
        let (hub, mut toasts) = hub(HubConfig {
            simulation: SimulationConfig {
                failure_rate: 1.0,
                ..fast_config().simulation
            },
            ..fast_config()
        });

        // Upload fails as well, so build the record by hand.
        let file = UploadedFile {
            id: "manual".to_string(),
            name: "sol.csv".to_string(),
            size: 1,
            file_type: FileType::Csv,
            last_modified: 0,
            url: url::Url::parse("blob:agripilot-data-hub/manual").unwrap(),
            detected_module: ModuleKind::Crops,
        };

        let view = hub.analyze(&file).await;
        assert!(view.analysis().is_none());

        let toasts = drain(&mut toasts);
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].is_error());
        assert_eq!(toasts[0].title, "Erreur d'analyse");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let (notifier, _toasts) = ChannelNotifier::new();
        let mut config = fast_config();
        config.simulation.failure_rate = 2.0;
        assert!(DataHub::with_fixtures(config, Arc::new(notifier)).is_err());
    }

    #[tokio::test]
    async fn test_page_uploader_settings_validated() {
        let (hub, _toasts) = hub(fast_config());
        let oversized = UploaderConfig {
            max_size_mb: u64::MAX,
            ..UploaderConfig::default()
        };
        assert!(matches!(hub.uploader_with(oversized), Err(AppError::Config(_))));

        let page = UploaderConfig {
            allowed_types: vec!["application/pdf".to_string()],
            ..UploaderConfig::default()
        };
        assert!(hub.uploader_with(page).is_ok());
    }
}

#[cfg(test)]
mod form_tests {
    use super::*;
    use crate::data::DataRepository;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_added_crop_is_listed_and_announced() {
        let (hub, mut toasts) = hub(fast_config());
        let crop = hub
            .add_crop(NewCrop {
                name: "Sorgho".to_string(),
                parcels: 1,
                area: 2.0,
                status: CropStatus::Active,
                yield_estimate: 2.8,
            })
            .await
            .unwrap();

        let crops = hub.repository().crops().await.unwrap();
        assert!(crops.contains(&crop));

        let toasts = drain(&mut toasts);
        assert_eq!(toasts.len(), 1);
        assert!(!toasts[0].is_error());
        assert_eq!(toasts[0].title, "Culture ajoutée");
        assert_eq!(toasts[0].description, "La culture Sorgho a été ajoutée avec succès.");
    }

    #[tokio::test]
    async fn test_rejected_crop_is_silent() {
        let (hub, mut toasts) = hub(fast_config());
        let result = hub
            .add_crop(NewCrop {
                name: "M".to_string(),
                parcels: 1,
                area: 0.0,
                status: CropStatus::Planned,
                yield_estimate: 1.0,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(drain(&mut toasts).is_empty());
    }

    #[tokio::test]
    async fn test_other_forms_announce() {
        let (hub, mut toasts) = hub(fast_config());
        hub.add_livestock_group(NewLivestockGroup {
            animal_type: "Moutons".to_string(),
            count: 30,
            health_status: HealthStatus::Average,
            next_action: None,
        })
        .await
        .unwrap();
        hub.add_financing_opportunity(NewFinancingOpportunity {
            title: "Aide irrigation".to_string(),
            provider: "Ministère".to_string(),
            amount: "500.000 FCFA".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            description: None,
        })
        .await
        .unwrap();

        let toasts = drain(&mut toasts);
        let titles: Vec<&str> = toasts.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Groupe d'animaux ajouté", "Demande de financement ajoutée"]);
        assert_eq!(
            toasts[1].description,
            "La demande pour \"Aide irrigation\" a été ajoutée avec succès."
        );
    }
}

#[cfg(test)]
mod assistant_tests {
    use super::*;

    #[tokio::test]
    async fn test_hub_answers_questions() {
        let (hub, mut toasts) = hub(fast_config());
        let reply = hub.ask("Quand semer le manioc ?").await.unwrap();
        assert_eq!(reply.topic, AssistantTopic::Crops);
        assert!(drain(&mut toasts).is_empty());

        assert!(matches!(hub.ask("").await, Err(AppError::Validation(_))));
    }
}

#[cfg(test)]
mod filesystem_tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Calendrier_Semis.CSV");
        let mut handle = std::fs::File::create(&path).unwrap();
        writeln!(handle, "culture,date\nmaïs,2025-05-12").unwrap();
        drop(handle);

        let source = SourceFile::from_path(&path).await.unwrap();
        assert_eq!(source.name, "Calendrier_Semis.CSV");
        assert_eq!(source.mime_type, "text/csv");
        assert!(source.size > 0);

        let (hub, _toasts) = hub(fast_config());
        let uploaded = upload_all(&hub, vec![source]).await;
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].file_type, FileType::Csv);
        assert_eq!(uploaded[0].detected_module, ModuleKind::Crops);
        assert_eq!(
            hub.blobs().data_url(&uploaded[0].url).map(|u| u.starts_with("data:text/csv;base64,")),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceFile::from_path(dir.path().join("absent.pdf")).await;
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }
}
