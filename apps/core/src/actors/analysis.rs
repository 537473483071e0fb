use crate::actors::archetypes::archetype;
use crate::actors::messages::{ActorError, AnalysisMessage, AppError};
use crate::actors::traits::AnalysisSimulator;
use crate::actors::{should_fail, simulated_delay, REPLY_GRACE};
use crate::config::{AnalysisMode, SimulationConfig};
use crate::models::{AnalysisModule, AnalysisResult, ModuleKind, UploadedFile};
use async_trait::async_trait;
use lru::LruCache;
use rand::seq::SliceRandom;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// A handle to the analysis actor.
///
/// In deterministic mode the archetype is the one matching the module
/// detected at upload time, so every upload gets an answer and the same
/// upload always gets the same one. Random mode draws an archetype per
/// upload identifier instead.
#[derive(Clone)]
pub struct AnalysisActorHandle {
    sender: mpsc::Sender<AnalysisMessage>,
    reply_timeout: Duration,
}

impl AnalysisActorHandle {
    /// Spawns the analysis actor on the current Tokio runtime.
    pub fn new(config: SimulationConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = config.analysis_latency + REPLY_GRACE;
        let actor = AnalysisActorRunner::new(receiver, config);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }
}

#[async_trait]
impl AnalysisSimulator for AnalysisActorHandle {
    #[instrument(skip(self, file), fields(upload_id = %file.id, module = %file.detected_module))]
    async fn analyze(&self, file: &UploadedFile) -> Result<Option<AnalysisResult>, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = AnalysisMessage::Analyze {
            upload_id: file.id.clone(),
            detected_module: file.detected_module,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Analysis actor closed".to_string())))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|_| AppError::Actor(ActorError::Internal("Analysis actor failed to respond".to_string())))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct AnalysisActorRunner {
    receiver: mpsc::Receiver<AnalysisMessage>,
    config: SimulationConfig,
    /// Random-mode draws, so repeated requests for one upload agree.
    draws: LruCache<String, AnalysisModule>,
}

impl AnalysisActorRunner {
    const CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(size) => size,
        None => panic!("Cache size must be non-zero"),
    };

    fn new(receiver: mpsc::Receiver<AnalysisMessage>, config: SimulationConfig) -> Self {
        Self {
            receiver,
            config,
            draws: LruCache::new(Self::CACHE_SIZE),
        }
    }

    async fn run(mut self) {
        info!("AnalysisActor started (mode: {:?})", self.config.analysis_mode);
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("AnalysisActor stopped");
    }

    async fn handle_message(&mut self, msg: AnalysisMessage) {
        match msg {
            AnalysisMessage::Analyze {
                upload_id,
                detected_module,
                mut responder,
            } => {
                if !simulated_delay(self.config.analysis_latency, &mut responder).await {
                    warn!("Analysis of {} abandoned by caller", upload_id);
                    return;
                }
                let result = self.analyze(&upload_id, detected_module);
                if responder.send(result).is_err() {
                    warn!("Failed to send analysis response (channel closed)");
                }
            }
        }
    }

    fn analyze(&mut self, upload_id: &str, detected: ModuleKind) -> Result<Option<AnalysisResult>, AppError> {
        if should_fail(self.config.failure_rate) {
            warn!("Injected analysis failure for {}", upload_id);
            return Err(ActorError::Analysis(format!("Simulated failure while analysing {}", upload_id)).into());
        }

        let module = match self.config.analysis_mode {
            AnalysisMode::Deterministic => detected.archetype(),
            AnalysisMode::Random => self.draw(upload_id)?,
        };

        info!(upload_id, module = %module, "Analysis ready");
        Ok(Some(archetype(module)))
    }

    fn draw(&mut self, upload_id: &str) -> Result<AnalysisModule, AppError> {
        if let Some(module) = self.draws.get(upload_id) {
            return Ok(*module);
        }
        let module = *AnalysisModule::ALL
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| AppError::Internal("No analysis archetypes".to_string()))?;
        self.draws.put(upload_id.to_string(), module);
        Ok(module)
    }
}
