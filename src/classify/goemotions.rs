// src/classify/goemotions.rs
//! Hosted text-classification backend (GoEmotions-style). POSTs the raw text
//! and parses either the nested `[[{label, score}, ...]]` shape or the flat
//! `[{label, score}, ...]` shape some deployments return.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::types::ScoredEmotion;

use super::{http_client, normalize, Classifier, ClassifierError};

pub struct GoEmotionsClassifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoEmotionsClassifier {
    pub fn new(cfg: &ClassifierConfig) -> Self {
        Self {
            http: http_client(cfg.timeout_secs),
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Resp {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

fn distribution(body: Resp) -> Result<Vec<ScoredEmotion>, ClassifierError> {
    let raw = match body {
        Resp::Nested(mut outer) => {
            if outer.is_empty() {
                return Err(ClassifierError::Malformed("empty outer array".into()));
            }
            outer.remove(0)
        }
        Resp::Flat(inner) => inner,
    };

    normalize(
        raw.into_iter()
            .map(|ls| ScoredEmotion::new(ls.label, ls.score))
            .collect(),
    )
}

#[async_trait]
impl Classifier for GoEmotionsClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredEmotion>, ClassifierError> {
        if self.api_key.is_empty() {
            return Err(ClassifierError::MissingApiKey);
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Req { inputs: text })
            .send()
            .await
            .map_err(ClassifierError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        distribution(body)
    }

    fn backend_name(&self) -> &'static str {
        "goemotions"
    }
}
