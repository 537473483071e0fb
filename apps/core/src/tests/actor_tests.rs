//! Actor System Tests
//!
//! Upload, analysis and assistant actors: records, determinism, failure
//! injection, sequential processing and abandoned requests.

use crate::actors::analysis::AnalysisActorHandle;
use crate::actors::messages::{ActorError, AppError};
use crate::actors::assistant::AssistantActorHandle;
use crate::actors::traits::{AnalysisSimulator, DecisionAssistant, UploadSimulator};
use crate::actors::upload::UploadActorHandle;
use crate::blob_store::BlobStore;
use crate::config::{AnalysisMode, SimulationConfig};
use crate::models::{AnalysisModule, AssistantTopic, FileType, ModuleKind, SourceFile, UploadedFile};
use std::collections::HashSet;
use tokio::time::{sleep, timeout, Duration, Instant};

// ============================================================================
// Fixtures
// ============================================================================

fn fast_config() -> SimulationConfig {
    SimulationConfig {
        upload_latency: Duration::from_millis(5),
        analysis_latency: Duration::from_millis(5),
        assistant_latency: Duration::from_millis(5),
        analysis_mode: AnalysisMode::Deterministic,
        failure_rate: 0.0,
    }
}

struct Actors {
    uploader: UploadActorHandle,
    analyzer: AnalysisActorHandle,
    blobs: BlobStore,
}

fn spawn_actors(config: SimulationConfig) -> Actors {
    let blobs = BlobStore::new();
    Actors {
        uploader: UploadActorHandle::new(config.clone(), blobs.clone()),
        analyzer: AnalysisActorHandle::new(config),
        blobs,
    }
}

/// An upload record the actors never produced.
fn foreign_upload(id: &str, detected_module: ModuleKind) -> UploadedFile {
    UploadedFile {
        id: id.to_string(),
        name: "externe.csv".to_string(),
        size: 3,
        file_type: FileType::Csv,
        last_modified: 0,
        url: url::Url::parse("blob:agripilot-data-hub/externe").unwrap(),
        detected_module,
    }
}

fn csv(name: &str) -> SourceFile {
    SourceFile::new(name, "text/csv", b"parcelle,rendement\nB2,6.7\n".to_vec())
}

// ============================================================================
// Upload actor
// ============================================================================

#[cfg(test)]
mod upload_actor_tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_builds_record() {
        let actors = spawn_actors(fast_config());
        let source = csv("rapport_sol_parcelleB2.csv").with_last_modified(1_715_000_000_000);

        let uploaded = actors.uploader.upload(source).await.unwrap();

        assert_eq!(uploaded.name, "rapport_sol_parcelleB2.csv");
        assert_eq!(uploaded.size, 26);
        assert_eq!(uploaded.file_type, FileType::Csv);
        assert_eq!(uploaded.detected_module, ModuleKind::Crops);
        assert_eq!(uploaded.last_modified, 1_715_000_000_000);
        assert_eq!(uploaded.url.scheme(), "blob");
        assert!(!uploaded.id.is_empty());
    }

    #[tokio::test]
    async fn test_upload_stores_blob() {
        let actors = spawn_actors(fast_config());
        let uploaded = actors.uploader.upload(csv("registre_bovins.csv")).await.unwrap();

        let blob = actors.blobs.get(&uploaded.url).expect("blob should be stored");
        assert_eq!(blob.mime_type, "text/csv");
        assert_eq!(&blob.bytes[..], b"parcelle,rendement\nB2,6.7\n");
        assert_eq!(uploaded.detected_module, ModuleKind::Livestock);
    }

    #[tokio::test]
    async fn test_upload_ids_are_unique() {
        let actors = spawn_actors(fast_config());
        let mut ids = HashSet::new();
        for i in 0..20 {
            let uploaded = actors.uploader.upload(csv(&format!("export_{}.csv", i))).await.unwrap();
            assert!(ids.insert(uploaded.id), "duplicate upload id");
        }
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let actors = spawn_actors(SimulationConfig {
            failure_rate: 1.0,
            ..fast_config()
        });

        let result = actors.uploader.upload(csv("semis.csv")).await;

        assert!(matches!(result, Err(AppError::Actor(ActorError::Upload(_)))));
        assert!(actors.blobs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_uploads_are_sequential() {
        let actors = spawn_actors(SimulationConfig {
            upload_latency: Duration::from_millis(500),
            ..fast_config()
        });
        let start = Instant::now();

        let (a, b) = tokio::join!(
            actors.uploader.upload(csv("a.csv")),
            actors.uploader.upload(csv("b.csv"))
        );

        assert!(a.is_ok() && b.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_upload_is_cancelled() {
        let actors = spawn_actors(SimulationConfig {
            upload_latency: Duration::from_millis(1500),
            ..fast_config()
        });

        let abandoned = timeout(Duration::from_millis(100), actors.uploader.upload(csv("sol.csv"))).await;
        assert!(abandoned.is_err());

        sleep(Duration::from_secs(3)).await;
        assert!(actors.blobs.is_empty());

        // The actor is still serving new requests.
        let uploaded = actors.uploader.upload(csv("sol.csv")).await.unwrap();
        assert_eq!(uploaded.detected_module, ModuleKind::Crops);
        assert_eq!(actors.blobs.len(), 1);
    }
}

// ============================================================================
// Analysis actor
// ============================================================================

#[cfg(test)]
mod analysis_actor_tests {
    use super::*;

    #[tokio::test]
    async fn test_analysis_follows_detected_module() {
        let actors = spawn_actors(fast_config());
        let cases = vec![
            ("parcelle.csv", AnalysisModule::Crops),
            ("vaccination.xlsx", AnalysisModule::Livestock),
            ("subvention.pdf", AnalysisModule::Financing),
            ("rapport_meteo.pdf", AnalysisModule::Decision),
            ("contrat.pdf", AnalysisModule::Documents),
        ];

        for (name, expected) in cases {
            let uploaded = actors.uploader.upload(csv(name)).await.unwrap();
            let analysis = actors.analyzer.analyze(&uploaded).await.unwrap().unwrap();
            assert_eq!(analysis.module_type, expected, "Wrong archetype for '{}'", name);
        }
    }

    #[tokio::test]
    async fn test_deterministic_per_identifier() {
        let actors = spawn_actors(fast_config());
        let uploaded = actors.uploader.upload(csv("budget.csv")).await.unwrap();

        let first = actors.analyzer.analyze(&uploaded).await.unwrap();
        let second = actors.analyzer.analyze(&uploaded).await.unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_any_identifier_gets_an_analysis() {
        let actors = spawn_actors(fast_config());
        let analysis = actors
            .analyzer
            .analyze(&foreign_upload("abc123", ModuleKind::Financing))
            .await
            .unwrap()
            .expect("every upload is analysable");
        assert_eq!(analysis.module_type, AnalysisModule::Financing);
    }

    #[tokio::test]
    async fn test_old_uploads_stay_analysable() {
        let actors = spawn_actors(fast_config());
        let first = actors.uploader.upload(csv("sol.csv")).await.unwrap();
        for i in 0..1100 {
            actors.analyzer.analyze(&foreign_upload(&format!("x{}", i), ModuleKind::Documents)).await.unwrap();
        }

        let analysis = actors.analyzer.analyze(&first).await.unwrap().unwrap();
        assert_eq!(analysis.module_type, AnalysisModule::Crops);
        assert!(actors.blobs.get(&first.url).is_some());
    }

    #[tokio::test]
    async fn test_random_mode_stays_in_closed_set() {
        let actors = spawn_actors(SimulationConfig {
            analysis_mode: AnalysisMode::Random,
            ..fast_config()
        });

        for i in 0..25 {
            let upload = foreign_upload(&format!("r{}", i), ModuleKind::Documents);
            let analysis = actors
                .analyzer
                .analyze(&upload)
                .await
                .unwrap()
                .expect("random mode always answers");
            assert!(AnalysisModule::ALL.contains(&analysis.module_type));
            assert!((0.0..=1.0).contains(&analysis.confidence));
            assert!(!analysis.recommendations.is_empty());

            let again = actors.analyzer.analyze(&upload).await.unwrap();
            assert_eq!(again.as_ref(), Some(&analysis), "Same upload, same draw");
        }
    }

    #[tokio::test]
    async fn test_injected_analysis_failure() {
        let actors = spawn_actors(SimulationConfig {
            failure_rate: 1.0,
            ..fast_config()
        });
        let result = actors.analyzer.analyze(&foreign_upload("any", ModuleKind::Crops)).await;
        assert!(matches!(result, Err(AppError::Actor(ActorError::Analysis(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_waits_for_latency() {
        let actors = spawn_actors(SimulationConfig {
            analysis_latency: Duration::from_millis(2000),
            analysis_mode: AnalysisMode::Random,
            ..fast_config()
        });
        let start = Instant::now();
        actors.analyzer.analyze(&foreign_upload("x", ModuleKind::Crops)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}

// ============================================================================
// Assistant actor
// ============================================================================

#[cfg(test)]
mod assistant_actor_tests {
    use super::*;

    fn assistant() -> AssistantActorHandle {
        AssistantActorHandle::new(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_topics_in_priority_order() {
        let assistant = assistant();
        let cases = vec![
            ("Prévisions météo et subventions ?", AssistantTopic::Weather),
            ("Comment fertiliser le MAÏS ?", AssistantTopic::Crops),
            ("Ma culture et mes vaches", AssistantTopic::Crops),
            ("Une vache boite", AssistantTopic::Livestock),
            ("Quelle aide pour mon élevage ?", AssistantTopic::Livestock),
            ("Quelle subvention demander ?", AssistantTopic::Financing),
            ("Bonjour", AssistantTopic::General),
        ];

        for (question, expected) in cases {
            let reply = assistant.ask(question.to_string()).await.unwrap();
            assert_eq!(reply.topic, expected, "Wrong topic for '{}'", question);
            assert!(!reply.content.is_empty());
        }
    }

    #[tokio::test]
    async fn test_general_reply_offers_topics() {
        let reply = assistant().ask("Et demain ?".to_string()).await.unwrap();
        assert_eq!(reply.topic, AssistantTopic::General);
        assert!(reply.content.starts_with("Merci pour votre question."));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let result = assistant().ask("   ".to_string()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reply_ids_are_unique() {
        let assistant = assistant();
        let a = assistant.ask("météo".to_string()).await.unwrap();
        let b = assistant.ask("météo".to_string()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.content, b.content);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_latency() {
        let assistant = AssistantActorHandle::new(Duration::from_millis(2000));
        let start = Instant::now();
        assistant.ask("manioc".to_string()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}
