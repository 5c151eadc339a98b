// src/safety.rs
//! Negative-emotion aggregation and emergency escalation. Distinct from the
//! crisis detector: that one matches explicit phrases before classification,
//! this one looks at the classified distribution afterwards and, when the
//! entry reads as extremely negative, notifies a configured trusted contact
//! through a webhook. Escalation is strictly best-effort; nothing here can
//! fail the pipeline.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{EmergencyContact, EscalationConfig};
use crate::respond::{excerpt, EXCERPT_CHARS};
use crate::types::EmotionResult;
use crate::vocabulary::Vocabulary;

/// True when the entry qualifies for escalation: the primary label, or any
/// emotion in the distribution, is in the vocabulary's negative set with a
/// score above its threshold. A crisis result always qualifies.
pub fn is_extremely_negative(emotion: &EmotionResult, vocabulary: &Vocabulary) -> bool {
    if emotion.is_crisis {
        return true;
    }
    let threshold = vocabulary.escalation_threshold();
    if vocabulary.is_negative(&emotion.label) && emotion.score > threshold {
        return true;
    }
    emotion
        .emotions
        .iter()
        .any(|e| vocabulary.is_negative(&e.label) && e.score > threshold)
}

/// Short grounding line shown alongside an escalated entry. Total over
/// labels; anything without a dedicated line gets the generic one.
pub fn comforting_message(label: &str) -> &'static str {
    match label {
        "sadness" => {
            "It's okay to feel sad. Remember, emotions come and go like waves, and this feeling will pass."
        }
        "anger" => {
            "Your anger is valid. Taking deep breaths can help you find calm in this storm."
        }
        "fear" => {
            "Fear can feel overwhelming, but you are stronger than you know. You've overcome challenges before."
        }
        "disgust" => {
            "These strong feelings are guiding you to understand your values better."
        }
        "grief" => {
            "Grief is love with nowhere to go. Be gentle with yourself during this time."
        }
        "remorse" => {
            "We all make mistakes. What matters is learning and growing from them."
        }
        "disappointment" => {
            "Disappointment is hard, but your worth isn't determined by outcomes."
        }
        "joy" | "love" => "It's wonderful to see you experiencing these positive feelings.",
        "neutral" => "Thank you for taking the time to check in with yourself.",
        _ => "This is a tough moment, and reaching out for support is a sign of strength.",
    }
}

pub struct EmergencyEscalator {
    http: reqwest::Client,
    webhook: Option<String>,
    contact: Option<EmergencyContact>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertPayload<'a> {
    entry_id: &'a str,
    text: String,
    emotion_label: &'a str,
    emotion_score: f32,
    timestamp: String,
    contact: ContactInfo<'a>,
}

#[derive(Serialize)]
struct ContactInfo<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

impl EmergencyEscalator {
    pub fn new(cfg: &EscalationConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("nous-emotion-engine/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            webhook: cfg.webhook_url.clone().filter(|u| !u.trim().is_empty()),
            contact: cfg.contact.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook.is_some() && self.contact.as_ref().is_some_and(|c| c.enabled)
    }

    /// Notify the trusted contact about `entry_id`. Returns whether the alert
    /// was delivered; misconfiguration and transport failures both come back
    /// as `false` with a log line, never as an error.
    pub async fn escalate(&self, entry_id: &str, text: &str, emotion: &EmotionResult) -> bool {
        let (Some(url), Some(contact)) = (self.webhook.as_deref(), self.contact.as_ref()) else {
            return false;
        };
        if !contact.enabled {
            return false;
        }

        let payload = AlertPayload {
            entry_id,
            text: excerpt(text, EXCERPT_CHARS),
            emotion_label: &emotion.label,
            emotion_score: emotion.score,
            timestamp: Utc::now().to_rfc3339(),
            contact: ContactInfo {
                name: &contact.name,
                email: &contact.email,
                phone: contact.phone.as_deref(),
            },
        };

        match self.http.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(entry_id, emotion = %emotion.label, "emergency alert delivered");
                true
            }
            Ok(resp) => {
                warn!(entry_id, status = %resp.status(), "emergency webhook rejected the alert");
                false
            }
            Err(e) => {
                warn!(entry_id, error = %e, "emergency webhook unreachable");
                false
            }
        }
    }
}
