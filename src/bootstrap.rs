// src/bootstrap.rs
//! Wiring façade: builds the vocabulary, resolver and generator from one
//! config file so the UI layer only ever holds a single handle.

use std::sync::Arc;

use tracing::info;

use crate::classify::build_classifier;
use crate::config::EngineConfig;
use crate::resolver::EmotionResolver;
use crate::respond::{ResponseContext, ResponseGenerator, ResponseStyle};
use crate::safety::{is_extremely_negative, EmergencyEscalator};
use crate::types::{ConversationMessage, EmotionResult, JournalEntry};
use crate::vocabulary::Vocabulary;

/// One-shot tracing setup for hosts that have no subscriber of their own
/// (demos, test harnesses). Respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

pub struct EmotionEngine {
    vocabulary: Arc<Vocabulary>,
    resolver: EmotionResolver,
    generator: ResponseGenerator,
    escalator: EmergencyEscalator,
}

impl EmotionEngine {
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let cfg = EngineConfig::load_from_file(path)?;
        // Safe diagnostics: provider + key length only, never the key.
        info!(
            provider = %cfg.classifier.provider,
            classifier_key_len = cfg.classifier.api_key.len(),
            workflow_configured = cfg.responder.workflow_url.is_some(),
            "engine config loaded"
        );
        Ok(Self::from_config(&cfg, Vocabulary::load()))
    }

    pub fn from_config(cfg: &EngineConfig, vocabulary: Vocabulary) -> Self {
        let vocabulary = Arc::new(vocabulary);
        let classifier = build_classifier(cfg, &vocabulary);
        Self {
            resolver: EmotionResolver::new(vocabulary.clone(), classifier),
            generator: ResponseGenerator::from_config(&cfg.responder),
            escalator: EmergencyEscalator::new(&cfg.escalation),
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Classify one journal text. Never fails.
    pub async fn analyze(&self, text: &str) -> EmotionResult {
        self.resolver.resolve(text).await
    }

    /// Generate a supportive reply for an already-resolved emotion.
    pub async fn respond(
        &self,
        text: &str,
        emotion: &EmotionResult,
        style: ResponseStyle,
        previous_emotion: Option<&str>,
        history: &[ConversationMessage],
    ) -> String {
        let ctx = ResponseContext {
            text,
            emotion,
            style,
            previous_emotion,
            history,
        };
        self.generator.generate(&ctx).await
    }

    /// Escalate a saved entry to the configured emergency contact when its
    /// emotion reads as extremely negative. Returns whether an alert went
    /// out; no-op (false) when the entry does not qualify or escalation is
    /// not configured.
    pub async fn maybe_escalate(&self, entry: &JournalEntry) -> bool {
        if !is_extremely_negative(&entry.emotion, &self.vocabulary) {
            return false;
        }
        self.escalator
            .escalate(&entry.id, &entry.text, &entry.emotion)
            .await
    }

    /// One full round: resolve the emotion, then generate the reply.
    pub async fn process(
        &self,
        text: &str,
        style: ResponseStyle,
        previous_emotion: Option<&str>,
        history: &[ConversationMessage],
    ) -> (EmotionResult, String) {
        let emotion = self.analyze(text).await;
        let message = self
            .respond(text, &emotion, style, previous_emotion, history)
            .await;
        (emotion, message)
    }
}
