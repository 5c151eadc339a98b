// src/classify/mod.rs
//! Classifier adapter: one uniform interface over interchangeable hosted
//! emotion-classification backends. All backend-specific response-shape
//! parsing stays inside this module; the rest of the pipeline only ever sees
//! a normalized, descending `Vec<ScoredEmotion>`.

pub mod goemotions;
pub mod zero_shot;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::types::ScoredEmotion;
use crate::vocabulary::Vocabulary;

/// Failure of one classification attempt. Callers fall back, they do not
/// retry — a single external call per classification request.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier API key is not configured")]
    MissingApiKey,
    #[error("classifier request timed out")]
    Timeout,
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("classifier returned an unexpected shape: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// Map transport errors so timeouts are distinguishable in logs.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClassifierError::Timeout
        } else {
            ClassifierError::Http(e)
        }
    }
}

/// One upstream emotion-classification backend. Exactly one implementation
/// is active per deployment, selected by [`build_classifier`].
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text` into a ranked, non-empty distribution. Never returns
    /// a partial or malformed result.
    async fn classify(&self, text: &str) -> Result<Vec<ScoredEmotion>, ClassifierError>;
    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}

pub type DynClassifier = Arc<dyn Classifier>;

/// Factory: build the configured backend (strategy selection happens here,
/// never at call sites). Unknown providers get a classifier that always
/// fails, which routes every request to the local heuristic.
pub fn build_classifier(config: &EngineConfig, vocabulary: &Arc<Vocabulary>) -> DynClassifier {
    match config.classifier.provider.as_str() {
        "goemotions" => Arc::new(goemotions::GoEmotionsClassifier::new(&config.classifier)),
        "zero-shot" => Arc::new(zero_shot::ZeroShotClassifier::new(
            &config.classifier,
            vocabulary.labels().to_vec(),
        )),
        other => {
            tracing::warn!(provider = %other, "unknown classifier provider; heuristic fallback will carry this deployment");
            Arc::new(DisabledClassifier)
        }
    }
}

/// Sort descending, fold percentage-shaped outputs back into probabilities,
/// clamp to [0, 1]. Labels pass through verbatim.
pub(crate) fn normalize(mut emotions: Vec<ScoredEmotion>) -> Result<Vec<ScoredEmotion>, ClassifierError> {
    if emotions.is_empty() {
        return Err(ClassifierError::Malformed("empty distribution".into()));
    }
    emotions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    if emotions[0].score > 1.0 {
        for e in &mut emotions {
            e.score /= 100.0;
        }
    }
    for e in &mut emotions {
        e.score = e.score.clamp(0.0, 1.0);
    }
    Ok(emotions)
}

pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("nous-emotion-engine/0.1")
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("reqwest client")
}

/// Always fails; used when no backend is configured.
pub struct DisabledClassifier;

#[async_trait]
impl Classifier for DisabledClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ScoredEmotion>, ClassifierError> {
        Err(ClassifierError::MissingApiKey)
    }
    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic mock for tests: a fixed distribution or a fixed failure,
/// with a call counter so tests can assert the crisis path never reaches the
/// network tier.
pub struct MockClassifier {
    fixed: Option<Vec<ScoredEmotion>>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn returning(emotions: Vec<ScoredEmotion>) -> Self {
        Self {
            fixed: Some(emotions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fixed: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ScoredEmotion>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fixed {
            Some(emotions) => normalize(emotions.clone()),
            None => Err(ClassifierError::Status(503)),
        }
    }
    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
