//! Decision-support assistant.
//!
//! Answers free-text questions with canned advice. The topic is picked from
//! keyword groups evaluated in priority order, the first match wins.

use crate::actors::messages::{ActorError, AppError, AssistantMessage};
use crate::actors::traits::DecisionAssistant;
use crate::actors::{simulated_delay, REPLY_GRACE};
use crate::models::{AssistantReply, AssistantTopic};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Opening message of a conversation.
pub const ASSISTANT_GREETING: &str = "Bonjour, je suis votre assistant agricole IA. Comment puis-je vous aider aujourd'hui? Vous pouvez me poser des questions sur vos cultures, votre élevage, ou demander des conseils basés sur vos données.";

const GENERAL_REPLY: &str = "Merci pour votre question. D'après l'analyse de vos documents et données agricoles, je peux vous suggérer plusieurs pistes d'optimisation. Souhaitez-vous des informations spécifiques sur vos cultures, votre élevage, ou les opportunités de financement disponibles?";

struct TopicRule {
    topic: AssistantTopic,
    pattern: Regex,
    reply: &'static str,
}

// Order is the matching priority.
// NOTE: expect() is acceptable here, the patterns are constants.
static TOPIC_RULES: LazyLock<Vec<TopicRule>> = LazyLock::new(|| {
    vec![
        TopicRule {
            topic: AssistantTopic::Weather,
            pattern: Regex::new(r"(?i)météo").expect("Invalid regex: weather keywords"),
            reply: "D'après les prévisions météorologiques pour votre région, les 7 prochains jours seront chauds et secs avec des températures entre 28°C et 32°C. Il y a un risque de sécheresse à surveiller. Je recommande d'augmenter l'irrigation de vos cultures, particulièrement pour les parcelles de maïs qui sont en phase critique de développement.",
        },
        TopicRule {
            topic: AssistantTopic::Crops,
            pattern: Regex::new(r"(?i)culture|maïs|manioc").expect("Invalid regex: crop keywords"),
            reply: "Basé sur l'analyse de vos données de sol et historique cultural, je recommande pour votre culture de maïs un apport d'azote supplémentaire dans les 10 prochains jours. Le taux d'humidité du sol est optimal actuellement, mais surveillez la parcelle B2 qui montre des signes de stress hydrique potentiel.",
        },
        TopicRule {
            topic: AssistantTopic::Livestock,
            pattern: Regex::new(r"(?i)animal|vache|élevage").expect("Invalid regex: livestock keywords"),
            reply: "Pour votre élevage bovin, l'analyse de vos données indique un bon état de santé général. Cependant, je note que la production laitière a légèrement diminué ces deux dernières semaines. Cela pourrait être lié à la qualité du fourrage ou à la chaleur. Je recommande de vérifier la qualité nutritionnelle de l'alimentation et d'assurer un accès permanent à de l'eau fraîche.",
        },
        TopicRule {
            topic: AssistantTopic::Financing,
            pattern: Regex::new(r"(?i)finance|subvention|aide").expect("Invalid regex: financing keywords"),
            reply: "J'ai identifié 2 programmes de subventions auxquels vous êtes potentiellement éligible: le Programme National d'Aide aux Agriculteurs (date limite: 30 juin) et le Financement pour Équipement Agricole de la Banque Agricole. D'après vos données, votre taux d'éligibilité est de 85% pour le premier et 70% pour le second. Souhaitez-vous que je vous aide à préparer un dossier de demande?",
        },
    ]
});

/// Topic and canned answer for a question. Falls back to a general reply.
pub fn compose_reply(message: &str) -> (AssistantTopic, &'static str) {
    TOPIC_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(message))
        .map(|rule| (rule.topic, rule.reply))
        .unwrap_or((AssistantTopic::General, GENERAL_REPLY))
}

/// A handle to the assistant actor. Questions are answered one at a time.
#[derive(Clone)]
pub struct AssistantActorHandle {
    sender: mpsc::Sender<AssistantMessage>,
    reply_timeout: Duration,
}

impl AssistantActorHandle {
    /// Spawns the assistant actor on the current Tokio runtime.
    pub fn new(latency: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = AssistantActorRunner { receiver, latency };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout: latency + REPLY_GRACE,
        }
    }
}

#[async_trait]
impl DecisionAssistant for AssistantActorHandle {
    #[instrument(skip(self, message))]
    async fn ask(&self, message: String) -> Result<AssistantReply, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("Empty question".to_string()));
        }

        let (send, recv) = oneshot::channel();
        let msg = AssistantMessage::Ask {
            message,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Assistant actor closed".to_string())))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|_| AppError::Actor(ActorError::Internal("Assistant actor failed to respond".to_string())))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct AssistantActorRunner {
    receiver: mpsc::Receiver<AssistantMessage>,
    latency: Duration,
}

impl AssistantActorRunner {
    async fn run(mut self) {
        info!("AssistantActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("AssistantActor stopped");
    }

    async fn handle_message(&mut self, msg: AssistantMessage) {
        match msg {
            AssistantMessage::Ask {
                message,
                mut responder,
            } => {
                if !simulated_delay(self.latency, &mut responder).await {
                    warn!("Question abandoned by caller");
                    return;
                }
                let (topic, content) = compose_reply(&message);
                debug!(?topic, "Assistant answered");
                let reply = AssistantReply {
                    id: Uuid::new_v4().to_string(),
                    topic,
                    content: content.to_string(),
                    timestamp: Utc::now(),
                };
                if responder.send(Ok(reply)).is_err() {
                    warn!("Failed to send assistant response (channel closed)");
                }
            }
        }
    }
}
