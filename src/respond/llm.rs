// src/respond/llm.rs
//! Tier 2: a direct chat-completion call with a fixed empathetic-therapist
//! persona. Request/response shapes follow the OpenAI-compatible wire format.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ResponderConfig;
use crate::types::Role;

use super::{excerpt, Responder, ResponseContext, ResponseError, EXCERPT_CHARS};

const SYSTEM_PROMPT: &str = "You are an empathetic, supportive listener for a \
private journaling app. For the given journal entry and detected emotion, \
reply with a calming, validating message of one or two sentences. Never \
mention that you are an AI or language model. Do not give medical advice; \
offer emotional support only, and end by gently inviting the user to share \
more.";

pub struct LlmResponder {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmResponder {
    pub fn new(cfg: &ResponderConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("nous-emotion-engine/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            endpoint: cfg.llm_endpoint.clone(),
            api_key: cfg.llm_api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        }
    }

    fn user_prompt(ctx: &ResponseContext<'_>) -> String {
        let mut prompt = format!(
            "Journal entry: \"{}\"\nDetected emotion: {} (confidence {}%, intensity {}).\n",
            excerpt(ctx.text, EXCERPT_CHARS),
            ctx.emotion.label,
            (ctx.emotion.score * 100.0).round() as u32,
            ctx.intensity().as_str(),
        );
        if let Some((from, to)) = ctx.emotion_shift() {
            prompt.push_str(&format!(
                "Note: their mood has shifted from {from} to {to}; acknowledge the change.\n"
            ));
        }
        match ctx.style {
            super::ResponseStyle::Empathetic => {
                prompt.push_str("Style guide: warm, professional, supportive.");
            }
            super::ResponseStyle::Slang => {
                prompt.push_str("Style guide: casual Gen Z slang, upbeat, emoji-friendly.");
            }
        }
        prompt
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: String,
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(&self, ctx: &ResponseContext<'_>) -> Result<String, ResponseError> {
        if self.api_key.is_empty() || self.endpoint.is_empty() {
            return Err(ResponseError::NotConfigured);
        }

        let prompt = Self::user_prompt(ctx);
        let mut messages = vec![Msg {
            role: "system",
            content: SYSTEM_PROMPT,
        }];
        for m in ctx.recent_history() {
            messages.push(Msg {
                role: match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &m.content,
            });
        }
        messages.push(Msg {
            role: "user",
            content: &prompt,
        });

        let req = Req {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(ResponseError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResponseError::Status(status.as_u16()));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ResponseError::Malformed(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            Err(ResponseError::Empty)
        } else {
            Ok(content)
        }
    }

    fn tier_name(&self) -> &'static str {
        "llm"
    }
}
