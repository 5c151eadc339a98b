// src/crisis.rs
//! Crisis detector: a deterministic safety gate that runs before any network
//! call. Substring matching on purpose — false positives are acceptable,
//! missed phrases are not.

use std::sync::Arc;

use crate::types::{EmotionResult, ScoredEmotion};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct CrisisDetector {
    vocabulary: Arc<Vocabulary>,
}

impl CrisisDetector {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Scan `text` for configured crisis phrases (case-insensitive). On a
    /// match returns a maximal-severity result; otherwise `None` and the
    /// pipeline continues. Pure and total over all inputs.
    pub fn detect(&self, text: &str) -> Option<EmotionResult> {
        let haystack = text.to_lowercase();
        let hit = self
            .vocabulary
            .crisis_phrases()
            .iter()
            .find(|p| haystack.contains(p.as_str()))?;

        let label = self.vocabulary.crisis_label().to_string();
        tracing::warn!(phrase = %hit, "crisis phrase detected; short-circuiting classification");

        Some(EmotionResult {
            emotions: vec![ScoredEmotion::new(label.clone(), 1.0)],
            color: self.vocabulary.color_for(&label),
            label,
            score: 1.0,
            flagged: true,
            is_crisis: true,
            is_fallback: false,
        })
    }
}
