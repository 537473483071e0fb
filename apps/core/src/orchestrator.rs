//! Upload orchestrator.
//!
//! Drives one upload batch at a time: validation, sequential simulated
//! uploads with a fixed-schedule progress indicator, and the user-facing
//! notifications. Progress is published on a `watch` channel so any number
//! of views can follow it.

use crate::actors::traits::UploadSimulator;
use crate::config::UploaderConfig;
use crate::models::{SourceFile, UploadedFile};
use crate::notify::{Notifier, Toast};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const PROGRESS_STEP: u8 = 10;
const PROGRESS_CAP: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Idle,
    Validating,
    Uploading,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub state: UploadState,
    /// 0 - 100
    pub percent: u8,
}

impl UploadProgress {
    pub const IDLE: UploadProgress = UploadProgress {
        state: UploadState::Idle,
        percent: 0,
    };
}

/// Why a file was refused before upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    TooLarge { max_size_mb: u64 },
    UnsupportedType { mime_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub file_name: String,
    pub reason: RejectionReason,
}

impl Rejection {
    /// The line shown to the user for this rejection.
    pub fn message(&self) -> String {
        match &self.reason {
            RejectionReason::TooLarge { max_size_mb } => format!(
                "Le fichier \"{}\" dépasse la taille maximale de {}MB.",
                self.file_name, max_size_mb
            ),
            RejectionReason::UnsupportedType { .. } => format!(
                "Le type de fichier \"{}\" n'est pas pris en charge.",
                self.file_name
            ),
        }
    }
}

/// Checks one file against the size ceiling, then the MIME allow-list.
pub fn validate_file(config: &UploaderConfig, file: &SourceFile) -> Result<(), Rejection> {
    if file.size > config.max_size_bytes() {
        return Err(Rejection {
            file_name: file.name.clone(),
            reason: RejectionReason::TooLarge {
                max_size_mb: config.max_size_mb,
            },
        });
    }

    if !config.allowed_types.is_empty() && !config.allowed_types.iter().any(|t| *t == file.mime_type) {
        return Err(Rejection {
            file_name: file.name.clone(),
            reason: RejectionReason::UnsupportedType {
                mime_type: file.mime_type.clone(),
            },
        });
    }

    Ok(())
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub uploaded: Vec<UploadedFile>,
    pub rejections: Vec<Rejection>,
    /// Set when the simulator failed and the rest of the batch was dropped.
    pub failure: Option<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && !self.uploaded.is_empty()
    }
}

pub type FileUploadedCallback = Arc<dyn Fn(&UploadedFile) + Send + Sync>;

pub struct UploadOrchestrator<U: UploadSimulator> {
    config: UploaderConfig,
    uploader: Arc<U>,
    notifier: Arc<dyn Notifier>,
    on_file_uploaded: Option<FileUploadedCallback>,
    progress: Arc<watch::Sender<UploadProgress>>,
}

impl<U: UploadSimulator> UploadOrchestrator<U> {
    pub fn new(config: UploaderConfig, uploader: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        let (progress, _) = watch::channel(UploadProgress::IDLE);
        Self {
            config,
            uploader,
            notifier,
            on_file_uploaded: None,
            progress: Arc::new(progress),
        }
    }

    /// Registers the callback invoked once per successfully uploaded file.
    pub fn on_file_uploaded<F>(mut self, callback: F) -> Self
    where
        F: Fn(&UploadedFile) + Send + Sync + 'static,
    {
        self.on_file_uploaded = Some(Arc::new(callback));
        self
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub fn progress(&self) -> UploadProgress {
        *self.progress.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// Runs one batch to completion and returns to `Idle`.
    ///
    /// Never fails: validation problems and simulator errors are reported to
    /// the notifier and in the returned [`BatchReport`].
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn process_files(&mut self, files: Vec<SourceFile>) -> BatchReport {
        let mut report = BatchReport::default();
        if files.is_empty() {
            return report;
        }

        let files: Vec<SourceFile> = if self.config.multiple {
            files
        } else {
            files.into_iter().take(1).collect()
        };

        let mut batch = BatchGuard::new(self.progress.clone());
        self.set_progress(UploadState::Validating, 0);

        let mut valid = Vec::with_capacity(files.len());
        for file in files {
            match validate_file(&self.config, &file) {
                Ok(()) => valid.push(file),
                Err(rejection) => {
                    warn!("Rejected {}: {:?}", rejection.file_name, rejection.reason);
                    report.rejections.push(rejection);
                }
            }
        }

        if !report.rejections.is_empty() {
            let description = report
                .rejections
                .iter()
                .map(Rejection::message)
                .collect::<Vec<_>>()
                .join("\n");
            self.notifier
                .notify(Toast::error("Erreur lors du téléchargement", description));
        }

        if valid.is_empty() {
            self.set_progress(UploadState::Idle, 0);
            return report;
        }

        let count = valid.len();
        self.set_progress(UploadState::Uploading, 0);
        batch.start_ticker(self.config.progress_tick);

        for file in valid {
            match self.uploader.upload(file).await {
                Ok(uploaded) => {
                    if let Some(callback) = &self.on_file_uploaded {
                        callback(&uploaded);
                    }
                    report.uploaded.push(uploaded);
                }
                Err(e) => {
                    batch.stop_ticker();
                    error!("File upload error: {}", e);
                    let percent = self.progress().percent;
                    self.set_progress(UploadState::Failed, percent);
                    self.notifier.notify(Toast::error(
                        "Erreur lors de l'analyse",
                        "Une erreur est survenue pendant l'analyse des fichiers. Veuillez réessayer.",
                    ));
                    self.set_progress(UploadState::Idle, 0);
                    report.failure = Some(e.to_string());
                    return report;
                }
            }
        }

        batch.stop_ticker();
        self.set_progress(UploadState::Complete, 100);
        info!("{} file(s) uploaded", count);
        self.notifier.notify(Toast::success(
            "Fichiers téléchargés avec succès",
            format!(
                "{} fichier(s) analysé(s) et prêt(s) à être utilisé(s).",
                count
            ),
        ));

        sleep(self.config.reset_delay).await;
        self.set_progress(UploadState::Idle, 0);
        report
    }

    fn set_progress(&self, state: UploadState, percent: u8) {
        self.progress.send_replace(UploadProgress { state, percent });
    }
}

/// Scoped resources of a running batch: the progress ticker task, aborted
/// when the batch ends, and a reset to `Idle` if the batch future is dropped
/// midway.
struct BatchGuard {
    progress: Arc<watch::Sender<UploadProgress>>,
    ticker: Option<JoinHandle<()>>,
}

impl BatchGuard {
    fn new(progress: Arc<watch::Sender<UploadProgress>>) -> Self {
        Self {
            progress,
            ticker: None,
        }
    }

    fn start_ticker(&mut self, tick: Duration) {
        let progress = self.progress.clone();
        self.ticker = Some(tokio::spawn(async move {
            loop {
                sleep(tick).await;
                let mut capped = false;
                progress.send_if_modified(|p| {
                    // A late tick after the batch moved on must not touch progress.
                    if p.state != UploadState::Uploading || p.percent >= PROGRESS_CAP {
                        capped = true;
                        return false;
                    }
                    p.percent = (p.percent + PROGRESS_STEP).min(PROGRESS_CAP);
                    capped = p.percent >= PROGRESS_CAP;
                    true
                });
                if capped {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.stop_ticker();
        self.progress.send_if_modified(|p| {
            if p.state == UploadState::Idle {
                return false;
            }
            *p = UploadProgress::IDLE;
            true
        });
    }
}
