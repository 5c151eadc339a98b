// src/types.rs
//! Canonical data model shared by the whole pipeline: scored emotions,
//! resolved results, conversation rounds and journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (label, score) pair out of a ranked emotion distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEmotion {
    pub label: String,
    pub score: f32,
}

impl ScoredEmotion {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Canonical output of the emotion resolver.
///
/// Invariant: `emotions` is non-empty, its maximum-score element carries
/// `label`, and `score` equals that maximum. Constructed fresh on every
/// classification; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub label: String,
    pub score: f32,
    /// Full ranked distribution (descending). Scores need not sum to 1.
    pub emotions: Vec<ScoredEmotion>,
    /// Presentation hint derived purely from `label`; never drives logic.
    pub color: String,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub is_crisis: bool,
    /// Set when the local heuristic produced this result (degraded path).
    #[serde(default)]
    pub is_fallback: bool,
}

impl EmotionResult {
    /// Build a result from an already-sorted, non-empty distribution.
    /// The top entry supplies `label` and `score`.
    pub fn from_distribution(emotions: Vec<ScoredEmotion>, color: String) -> Self {
        debug_assert!(!emotions.is_empty(), "distribution must be non-empty");
        let top = &emotions[0];
        Self {
            label: top.label.clone(),
            score: top.score,
            color,
            flagged: false,
            is_crisis: false,
            is_fallback: false,
            emotions,
        }
    }

    /// Single-entry result (crisis path, heuristic path, neutral shortcuts).
    pub fn single(label: impl Into<String>, score: f32, color: String) -> Self {
        let label = label.into();
        Self {
            emotions: vec![ScoredEmotion::new(label.clone(), score)],
            label,
            score,
            color,
            flagged: false,
            is_crisis: false,
            is_fallback: false,
        }
    }
}

/// Who produced a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the journaling conversation. Only user messages normally
/// carry an emotion; assistant messages hold the generated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionResult>,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>, emotion: EmotionResult) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            emotion: Some(emotion),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            emotion: None,
        }
    }
}

/// A saved journal entry: the submitted text, its resolved emotion and the
/// conversation rounds that grew out of it. Append-only except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub emotion: EmotionResult,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>, emotion: EmotionResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: None,
            text: text.into(),
            timestamp: Utc::now(),
            emotion,
            messages: Vec::new(),
        }
    }

    /// Append one user/assistant round. `emotion` mirrors the newest user
    /// message so single-shot consumers keep seeing the latest state.
    pub fn append_round(&mut self, user: ConversationMessage, assistant: ConversationMessage) {
        if let Some(e) = &user.emotion {
            self.emotion = e.clone();
        }
        self.messages.push(user);
        self.messages.push(assistant);
    }
}

/// Three-way bucket of a confidence score, used to pick response wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    pub fn from_score(score: f32) -> Self {
        if score > 0.8 {
            Intensity::High
        } else if score < 0.4 {
            Intensity::Low
        } else {
            Intensity::Moderate
        }
    }

    /// Wire-stable lowercase name (workflow payload, prompts).
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Moderate => "moderate",
            Intensity::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_buckets() {
        assert_eq!(Intensity::from_score(0.91), Intensity::High);
        assert_eq!(Intensity::from_score(0.8), Intensity::Moderate);
        assert_eq!(Intensity::from_score(0.4), Intensity::Moderate);
        assert_eq!(Intensity::from_score(0.39), Intensity::Low);
        assert_eq!(Intensity::from_score(0.0), Intensity::Low);
    }

    #[test]
    fn from_distribution_takes_top() {
        let r = EmotionResult::from_distribution(
            vec![
                ScoredEmotion::new("sadness", 0.91),
                ScoredEmotion::new("neutral", 0.05),
            ],
            "#5C7CFA".to_string(),
        );
        assert_eq!(r.label, "sadness");
        assert!((r.score - 0.91).abs() < f32::EPSILON);
        assert_eq!(r.emotions.len(), 2);
        assert!(!r.is_crisis && !r.flagged && !r.is_fallback);
    }

    #[test]
    fn append_round_mirrors_latest_user_emotion() {
        let first = EmotionResult::single("neutral", 0.5, "#CED4DA".into());
        let mut entry = JournalEntry::new("first note", first);

        let joy = EmotionResult::single("joy", 0.8, "#FFD43B".into());
        entry.append_round(
            ConversationMessage::user("feeling better now", joy.clone()),
            ConversationMessage::assistant("Glad to hear it."),
        );

        assert_eq!(entry.emotion, joy);
        assert_eq!(entry.messages.len(), 2);
        assert_eq!(entry.messages[0].role, Role::User);
        assert_eq!(entry.messages[1].role, Role::Assistant);
    }
}
