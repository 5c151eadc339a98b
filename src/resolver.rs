// src/resolver.rs
//! Emotion resolver: crisis gate → classifier adapter → local heuristic.
//! Total from the caller's perspective — every internal failure is absorbed
//! and a well-formed `EmotionResult` always comes back.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::DynClassifier;
use crate::crisis::CrisisDetector;
use crate::heuristic::HeuristicClassifier;
use crate::types::{EmotionResult, ScoredEmotion};
use crate::vocabulary::Vocabulary;

pub struct EmotionResolver {
    vocabulary: Arc<Vocabulary>,
    crisis: CrisisDetector,
    classifier: DynClassifier,
    heuristic: HeuristicClassifier,
}

impl EmotionResolver {
    pub fn new(vocabulary: Arc<Vocabulary>, classifier: DynClassifier) -> Self {
        Self {
            crisis: CrisisDetector::new(vocabulary.clone()),
            heuristic: HeuristicClassifier::new(vocabulary.clone()),
            vocabulary,
            classifier,
        }
    }

    /// Resolve `text` to an emotion. Never errors.
    ///
    /// Order matters: the crisis gate runs before any network call, so
    /// flagged text costs zero upstream requests; classifier failures fall
    /// through to the heuristic with `is_fallback` set.
    pub async fn resolve(&self, text: &str) -> EmotionResult {
        if let Some(crisis) = self.crisis.detect(text) {
            return crisis;
        }

        // Blank input is a caller/UI validation concern; still answer with
        // something well-formed instead of burning a network call.
        if text.trim().is_empty() {
            let neutral = self.vocabulary.neutral();
            return EmotionResult::single(neutral, 0.5, self.vocabulary.color_for(neutral));
        }

        match self.classifier.classify(text).await {
            Ok(emotions) => {
                debug!(
                    backend = self.classifier.backend_name(),
                    top = %emotions[0].label,
                    score = emotions[0].score,
                    "classifier succeeded"
                );
                self.from_classifier(emotions)
            }
            Err(e) => {
                warn!(
                    backend = self.classifier.backend_name(),
                    error = %e,
                    "classifier failed; using local heuristic"
                );
                let guess = self.heuristic.classify(text);
                let mut result = EmotionResult::single(
                    guess.label.clone(),
                    guess.score,
                    self.vocabulary.color_for(&guess.label),
                );
                result.is_fallback = true;
                result
            }
        }
    }

    /// Wrap a normalized (sorted, clamped, non-empty) distribution. An
    /// unrecognized top label is canonicalized to neutral, relabeling the top
    /// entry too so the top-of-`emotions` invariant holds.
    fn from_classifier(&self, mut emotions: Vec<ScoredEmotion>) -> EmotionResult {
        let canonical = self.vocabulary.canonicalize(&emotions[0].label).to_string();
        if canonical != emotions[0].label {
            debug!(raw = %emotions[0].label, mapped = %canonical, "unknown label mapped to neutral");
            emotions[0].label = canonical;
        }
        let color = self.vocabulary.color_for(&emotions[0].label);
        EmotionResult::from_distribution(emotions, color)
    }
}
