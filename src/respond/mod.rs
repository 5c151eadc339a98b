// src/respond/mod.rs
//! Response generator: an ordered chain of responders (workflow service →
//! chat-completion LLM → static templates) that turns a resolved emotion into
//! a short supportive message. The chain is iterated until one tier succeeds;
//! the template tier cannot fail, so the output is never empty.

pub mod llm;
pub mod template;
pub mod workflow;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ResponderConfig;
use crate::types::{ConversationMessage, EmotionResult, Intensity};

/// How many trailing history messages are forwarded upstream.
pub(crate) const HISTORY_WINDOW: usize = 5;
/// Entry text is truncated to this many chars before leaving the device.
pub(crate) const EXCERPT_CHARS: usize = 200;

/// Returned only if every tier fails, which the template tier prevents in
/// practice. Kept so `generate` is total by construction, not by convention.
const GENERIC_FALLBACK: &str =
    "Thank you for sharing your feelings. I'm here to listen whenever you'd like to say more.";

/// Wording register. Changes phrasing only, never emotion/intensity logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    Empathetic,
    Slang,
}

impl ResponseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStyle::Empathetic => "empathetic",
            ResponseStyle::Slang => "slang",
        }
    }
}

/// Everything a tier needs to produce a reply. The pipeline holds no state
/// between calls; `previous_emotion` and `history` come from the caller.
pub struct ResponseContext<'a> {
    pub text: &'a str,
    pub emotion: &'a EmotionResult,
    pub style: ResponseStyle,
    pub previous_emotion: Option<&'a str>,
    pub history: &'a [ConversationMessage],
}

impl<'a> ResponseContext<'a> {
    pub fn intensity(&self) -> Intensity {
        Intensity::from_score(self.emotion.score)
    }

    /// `(from, to)` when the mood changed since the previous round. All
    /// three tiers acknowledge this; it is a continuity feature, not flavor.
    pub fn emotion_shift(&self) -> Option<(&'a str, &str)> {
        match self.previous_emotion {
            Some(prev) if prev != self.emotion.label => Some((prev, &self.emotion.label)),
            _ => None,
        }
    }

    /// Trailing history window forwarded to network tiers.
    pub fn recent_history(&self) -> &'a [ConversationMessage] {
        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        &self.history[start..]
    }
}

/// Failure of one response tier. Recovered by advancing to the next tier.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("tier is not configured")]
    NotConfigured,
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream returned an unexpected shape: {0}")]
    Malformed(String),
    #[error("upstream returned an empty response")]
    Empty,
}

impl ResponseError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ResponseError::Timeout
        } else {
            ResponseError::Http(e)
        }
    }
}

/// One fallback tier. All tiers satisfy the same contract and are tried in
/// order — a chain of responsibility, not N near-duplicate functions.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, ctx: &ResponseContext<'_>) -> Result<String, ResponseError>;
    fn tier_name(&self) -> &'static str;
}

pub type DynResponder = Arc<dyn Responder>;

pub struct ResponseGenerator {
    tiers: Vec<DynResponder>,
}

impl ResponseGenerator {
    /// Standard chain: workflow → LLM → templates.
    pub fn from_config(cfg: &ResponderConfig) -> Self {
        Self::with_tiers(vec![
            Arc::new(workflow::WorkflowResponder::new(cfg)),
            Arc::new(llm::LlmResponder::new(cfg)),
            Arc::new(template::TemplateResponder),
        ])
    }

    /// Custom chain for tests or alternate deployments. The caller is
    /// expected to keep an infallible tier at the end.
    pub fn with_tiers(tiers: Vec<DynResponder>) -> Self {
        Self { tiers }
    }

    /// Produce a supportive message. Never returns an empty string: the
    /// template tier is total, and a generic sentence covers the (unreachable
    /// with the standard chain) case of full exhaustion.
    pub async fn generate(&self, ctx: &ResponseContext<'_>) -> String {
        for tier in &self.tiers {
            match tier.respond(ctx).await {
                Ok(msg) if !msg.trim().is_empty() => {
                    debug!(tier = tier.tier_name(), "response tier succeeded");
                    return msg;
                }
                Ok(_) => {
                    warn!(tier = tier.tier_name(), "tier returned blank output; advancing");
                }
                Err(e) => {
                    warn!(tier = tier.tier_name(), error = %e, "response tier failed; advancing");
                }
            }
        }
        GENERIC_FALLBACK.to_string()
    }
}

/// Truncate to `max` chars, appending an ellipsis like the journal UI does.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

/// Deterministic mock tier for chain tests.
pub struct MockResponder {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockResponder {
    pub fn succeeding(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, _ctx: &ResponseContext<'_>) -> Result<String, ResponseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(r) => Ok(r.clone()),
            None => Err(ResponseError::Status(502)),
        }
    }
    fn tier_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionResult;

    fn joy() -> EmotionResult {
        EmotionResult::single("joy", 0.9, "#FFD43B".into())
    }

    fn ctx<'a>(emotion: &'a EmotionResult) -> ResponseContext<'a> {
        ResponseContext {
            text: "today was great",
            emotion,
            style: ResponseStyle::Empathetic,
            previous_emotion: None,
            history: &[],
        }
    }

    #[tokio::test]
    async fn first_successful_tier_wins() {
        let first = Arc::new(MockResponder::succeeding("from tier one"));
        let second = Arc::new(MockResponder::succeeding("from tier two"));
        let gen = ResponseGenerator::with_tiers(vec![first.clone(), second.clone()]);

        let emotion = joy();
        let out = gen.generate(&ctx(&emotion)).await;
        assert_eq!(out, "from tier one");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_advances_to_next_tier() {
        let first = Arc::new(MockResponder::failing());
        let second = Arc::new(MockResponder::succeeding("recovered"));
        let gen = ResponseGenerator::with_tiers(vec![first.clone(), second.clone()]);

        let emotion = joy();
        let out = gen.generate(&ctx(&emotion)).await;
        assert_eq!(out, "recovered");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_success_counts_as_failure() {
        let first = Arc::new(MockResponder::succeeding("   "));
        let second = Arc::new(MockResponder::succeeding("real words"));
        let gen = ResponseGenerator::with_tiers(vec![first, second]);

        let emotion = joy();
        assert_eq!(gen.generate(&ctx(&emotion)).await, "real words");
    }

    #[tokio::test]
    async fn exhaustion_yields_generic_sentence() {
        let gen = ResponseGenerator::with_tiers(vec![
            Arc::new(MockResponder::failing()),
            Arc::new(MockResponder::failing()),
        ]);

        let emotion = joy();
        let out = gen.generate(&ctx(&emotion)).await;
        assert!(!out.trim().is_empty());
    }

    #[test]
    fn excerpt_truncates_on_char_boundaries() {
        assert_eq!(excerpt("short", 200), "short");
        let long = "é".repeat(250);
        let cut = excerpt(&long, 200);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn shift_detection() {
        let emotion = joy();
        let mut c = ctx(&emotion);
        assert!(c.emotion_shift().is_none());
        c.previous_emotion = Some("joy");
        assert!(c.emotion_shift().is_none());
        c.previous_emotion = Some("sadness");
        assert_eq!(c.emotion_shift(), Some(("sadness", "joy")));
    }
}
