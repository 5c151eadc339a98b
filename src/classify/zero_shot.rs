// src/classify/zero_shot.rs
//! Zero-shot classification backend: sends the configured vocabulary as
//! candidate labels and parses the `{labels: [...], scores: [...]}` shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::types::ScoredEmotion;

use super::{http_client, normalize, Classifier, ClassifierError};

pub struct ZeroShotClassifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    candidate_labels: Vec<String>,
}

impl ZeroShotClassifier {
    pub fn new(cfg: &ClassifierConfig, candidate_labels: Vec<String>) -> Self {
        Self {
            http: http_client(cfg.timeout_secs),
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            candidate_labels,
        }
    }
}

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a str,
    parameters: Params<'a>,
}

#[derive(Serialize)]
struct Params<'a> {
    candidate_labels: &'a [String],
}

#[derive(Deserialize)]
struct Resp {
    labels: Vec<String>,
    scores: Vec<f32>,
}

fn distribution(body: Resp) -> Result<Vec<ScoredEmotion>, ClassifierError> {
    if body.labels.len() != body.scores.len() {
        return Err(ClassifierError::Malformed(format!(
            "labels/scores length mismatch: {} vs {}",
            body.labels.len(),
            body.scores.len()
        )));
    }

    normalize(
        body.labels
            .into_iter()
            .zip(body.scores)
            .map(|(label, score)| ScoredEmotion::new(label, score))
            .collect(),
    )
}

#[async_trait]
impl Classifier for ZeroShotClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredEmotion>, ClassifierError> {
        if self.api_key.is_empty() {
            return Err(ClassifierError::MissingApiKey);
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Req {
                inputs: text,
                parameters: Params {
                    candidate_labels: &self.candidate_labels,
                },
            })
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
        "zero-shot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_scores_wire_shape() {
        let body: Resp = serde_json::from_str(
            r#"{"sequence": "ignored", "labels": ["sadness", "joy"], "scores": [0.75, 0.2]}"#,
        )
        .expect("zero-shot shape");
        let dist = distribution(body).expect("distribution");
        assert_eq!(dist[0].label, "sadness");
        assert!((dist[0].score - 0.75).abs() < 1e-6);
        assert_eq!(dist[1].label, "joy");
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let body: Resp =
            serde_json::from_str(r#"{"labels": ["sadness", "joy"], "scores": [0.75]}"#)
                .expect("shape deserializes even when lengths disagree");
        assert!(matches!(
            distribution(body),
            Err(ClassifierError::Malformed(_))
        ));
    }
}
