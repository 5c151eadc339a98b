// src/respond/workflow.rs
//! Tier 1: an external workflow service (n8n-style webhook). Gets the full
//! structured context and may itself call an LLM, hence the longer timeout
//! than classification.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::ResponderConfig;
use crate::types::{Role, ScoredEmotion};

use super::{excerpt, Responder, ResponseContext, ResponseError, EXCERPT_CHARS};

pub struct WorkflowResponder {
    http: reqwest::Client,
    url: Option<String>,
}

impl WorkflowResponder {
    pub fn new(cfg: &ResponderConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("nous-emotion-engine/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            url: cfg.workflow_url.clone().filter(|u| !u.trim().is_empty()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    user_message: String,
    emotion: &'a str,
    emotion_score: f32,
    style: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_emotion: Option<&'a str>,
    conversation_history: Vec<HistoryMsg<'a>>,
    timestamp: String,
    text_length: usize,
    all_emotions: &'a [ScoredEmotion],
    emotion_intensity: &'a str,
}

#[derive(Serialize)]
struct HistoryMsg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Reply {
    success: bool,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl Responder for WorkflowResponder {
    async fn respond(&self, ctx: &ResponseContext<'_>) -> Result<String, ResponseError> {
        // Absent URL behaves exactly like a network failure of this tier.
        let url = self.url.as_deref().ok_or(ResponseError::NotConfigured)?;

        let history: Vec<HistoryMsg<'_>> = ctx
            .recent_history()
            .iter()
            .map(|m| HistoryMsg {
                role: match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect();

        let payload = Payload {
            user_message: excerpt(ctx.text, EXCERPT_CHARS),
            emotion: &ctx.emotion.label,
            emotion_score: ctx.emotion.score,
            style: ctx.style.as_str(),
            previous_emotion: ctx.previous_emotion,
            conversation_history: history,
            timestamp: Utc::now().to_rfc3339(),
            text_length: ctx.text.chars().count(),
            all_emotions: &ctx.emotion.emotions,
            emotion_intensity: ctx.intensity().as_str(),
        };

        let resp = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(ResponseError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResponseError::Status(status.as_u16()));
        }

        let reply: Reply = resp
            .json()
            .await
            .map_err(|e| ResponseError::Malformed(e.to_string()))?;

        if !reply.success {
            return Err(ResponseError::Malformed(
                reply.error.unwrap_or_else(|| "workflow reported failure".into()),
            ));
        }
        match reply.response {
            Some(msg) if !msg.trim().is_empty() => Ok(msg),
            _ => Err(ResponseError::Empty),
        }
    }

    fn tier_name(&self) -> &'static str {
        "workflow"
    }
}
