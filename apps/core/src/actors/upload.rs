use crate::actors::messages::{ActorError, AppError, UploadMessage};
use crate::actors::traits::UploadSimulator;
use crate::actors::{should_fail, simulated_delay, REPLY_GRACE};
use crate::blob_store::BlobStore;
use crate::classify::{classify_file_type, detect_module_with_matches};
use crate::config::SimulationConfig;
use crate::models::{SourceFile, UploadedFile};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A handle to the upload actor.
///
/// Cloneable; every clone feeds the same actor, which processes uploads one
/// at a time in arrival order.
#[derive(Clone)]
pub struct UploadActorHandle {
    sender: mpsc::Sender<UploadMessage>,
    reply_timeout: Duration,
}

impl UploadActorHandle {
    /// Spawns the upload actor on the current Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Latency and failure injection settings.
    /// * `blobs` - Store receiving the uploaded bytes.
    pub fn new(config: SimulationConfig, blobs: BlobStore) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = config.upload_latency + REPLY_GRACE;
        let actor = UploadActorRunner {
            receiver,
            config,
            blobs,
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }
}

#[async_trait]
impl UploadSimulator for UploadActorHandle {
    #[instrument(skip(self, file), fields(file_name = %file.name))]
    async fn upload(&self, file: SourceFile) -> Result<UploadedFile, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = UploadMessage::Upload {
            file,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Upload actor closed".to_string())))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|_| AppError::Actor(ActorError::Internal("Upload actor failed to respond".to_string())))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct UploadActorRunner {
    receiver: mpsc::Receiver<UploadMessage>,
    config: SimulationConfig,
    blobs: BlobStore,
}

impl UploadActorRunner {
    async fn run(mut self) {
        info!("UploadActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("UploadActor stopped");
    }

    async fn handle_message(&mut self, msg: UploadMessage) {
        match msg {
            UploadMessage::Upload {
                file,
                mut responder,
            } => {
                if !simulated_delay(self.config.upload_latency, &mut responder).await {
                    warn!("Upload of {} abandoned by caller", file.name);
                    return;
                }
                let result = self.process(file);
                if responder.send(result).is_err() {
                    warn!("Failed to send upload response (channel closed)");
                }
            }
        }
    }

    fn process(&self, file: SourceFile) -> Result<UploadedFile, AppError> {
        if should_fail(self.config.failure_rate) {
            warn!("Injected upload failure for {}", file.name);
            return Err(ActorError::Upload(format!("Simulated failure while processing {}", file.name)).into());
        }

        let file_type = classify_file_type(&file.name);
        let detection = detect_module_with_matches(&file.name);
        let url = self.blobs.create_object_url(&file.mime_type, file.bytes.clone())?;
        let id = Uuid::new_v4().simple().to_string();

        info!(
            upload_id = %id,
            file_type = %file_type,
            module = %detection.module,
            keyword = ?detection.matched_keyword,
            "Uploaded {} ({} bytes)",
            file.name,
            file.size
        );

        Ok(UploadedFile {
            id,
            name: file.name,
            size: file.size,
            file_type,
            last_modified: file.last_modified,
            url,
            detected_module: detection.module,
        })
    }
}
