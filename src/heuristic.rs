// src/heuristic.rs
//! Local keyword classifier: the terminal classification fallback. Pure,
//! synchronous, cannot fail. Its job is "never block the user", not accuracy,
//! so the synthesized score deliberately tops out below real-classifier
//! confidence.

use std::sync::Arc;

use crate::types::ScoredEmotion;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    vocabulary: Arc<Vocabulary>,
}

impl HeuristicClassifier {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Count keyword substring matches per label; the highest count wins.
    /// Ties and the zero-match case resolve to the neutral label. Score is
    /// `min(0.5 + 0.1 * matches, 0.9)`, exactly 0.5 when nothing matched.
    pub fn classify(&self, text: &str) -> ScoredEmotion {
        let haystack = text.to_lowercase();

        let mut best_label: Option<&str> = None;
        let mut best_count = 0usize;
        let mut tied = false;

        // BTreeMap iteration keeps tie detection deterministic.
        for (label, words) in self.vocabulary.keywords() {
            let count = words
                .iter()
                .filter(|w| haystack.contains(w.to_lowercase().as_str()))
                .count();
            if count == 0 {
                continue;
            }
            if count > best_count {
                best_count = count;
                best_label = Some(label);
                tied = false;
            } else if count == best_count {
                tied = true;
            }
        }

        let label = match best_label {
            Some(l) if !tied => l,
            _ => self.vocabulary.neutral(),
        };
        let score = if best_count == 0 {
            0.5
        } else {
            (0.5 + 0.1 * best_count as f32).min(0.9)
        };

        ScoredEmotion::new(label, score)
    }
}
