// src/config.rs
//! Engine configuration, passed explicitly into the resolver and generator at
//! construction — never read from ambient global state. Key fields accept an
//! `"ENV"` sentinel; a missing environment variable resolves to an empty key,
//! which downstream tiers treat as an immediate tier failure rather than an
//! error that could escape the pipeline.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const ENV_CLASSIFIER_API_KEY: &str = "EMOTION_API_KEY";
pub const ENV_RESPONSE_API_KEY: &str = "RESPONSE_API_KEY";

fn default_classifier_timeout() -> u64 {
    5
}
fn default_responder_timeout() -> u64 {
    20
}
fn default_max_tokens() -> u32 {
    120
}
fn default_temperature() -> f32 {
    0.8
}
fn default_escalation_timeout() -> u64 {
    10
}
fn default_contact_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub responder: ResponderConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// "goemotions" | "zero-shot"; anything else disables the network path.
    pub provider: String,
    pub endpoint: String,
    /// "ENV" means: read from EMOTION_API_KEY.
    pub api_key: String,
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Tier-1 workflow webhook. Absent means the tier is skipped.
    #[serde(default)]
    pub workflow_url: Option<String>,
    pub llm_endpoint: String,
    /// "ENV" means: read from RESPONSE_API_KEY.
    pub llm_api_key: String,
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_responder_timeout")]
    pub timeout_secs: u64,
}

/// Emergency-escalation webhook. Both the URL and a contact must be present
/// (and the contact enabled) for escalation to fire; anything less means the
/// feature is off, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub contact: Option<EmergencyContact>,
    #[serde(default = "default_escalation_timeout")]
    pub timeout_secs: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            contact: None,
            timeout_secs: default_escalation_timeout(),
        }
    }
}

/// Trusted person notified when an entry reads as extremely negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_contact_enabled")]
    pub enabled: bool,
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: EngineConfig = serde_json::from_str(&data)?;

        cfg.classifier.provider = cfg.classifier.provider.to_lowercase();
        cfg.classifier.api_key = resolve_key(&cfg.classifier.api_key, ENV_CLASSIFIER_API_KEY);
        cfg.responder.llm_api_key = resolve_key(&cfg.responder.llm_api_key, ENV_RESPONSE_API_KEY);

        // Sanity clamps; a zero timeout would turn every call into a failure.
        cfg.classifier.timeout_secs = cfg.classifier.timeout_secs.clamp(1, 60);
        cfg.responder.timeout_secs = cfg.responder.timeout_secs.clamp(1, 120);
        cfg.escalation.timeout_secs = cfg.escalation.timeout_secs.clamp(1, 60);
        if !(0.0..=2.0).contains(&cfg.responder.temperature) {
            cfg.responder.temperature = default_temperature();
        }

        Ok(cfg)
    }
}

/// `"ENV"` → environment lookup; an absent variable yields an empty string so
/// credential absence acts like any other tier failure downstream.
fn resolve_key(configured: &str, var: &str) -> String {
    if configured.trim().eq_ignore_ascii_case("env") {
        env::var(var).unwrap_or_default()
    } else {
        configured.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_key_passes_literals_through() {
        assert_eq!(resolve_key("sk-abc", "NO_SUCH_VAR_12345"), "sk-abc");
    }

    #[test]
    fn resolve_key_env_missing_is_empty_not_error() {
        assert_eq!(resolve_key("ENV", "NO_SUCH_VAR_12345"), "");
        assert_eq!(resolve_key("env", "NO_SUCH_VAR_12345"), "");
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let json = r#"{
            "classifier": {
                "provider": "GoEmotions",
                "endpoint": "https://example.test/classify",
                "api_key": "k"
            },
            "responder": {
                "llm_endpoint": "https://example.test/chat",
                "llm_api_key": "k",
                "model": "m"
            }
        }"#;
        let mut cfg: EngineConfig = serde_json::from_str(json).expect("parse");
        cfg.classifier.provider = cfg.classifier.provider.to_lowercase();
        assert_eq!(cfg.classifier.provider, "goemotions");
        assert_eq!(cfg.classifier.timeout_secs, 5);
        assert_eq!(cfg.responder.timeout_secs, 20);
        assert_eq!(cfg.responder.max_tokens, 120);
        assert!(cfg.responder.workflow_url.is_none());
        assert!(cfg.escalation.webhook_url.is_none());
        assert!(cfg.escalation.contact.is_none());
        assert_eq!(cfg.escalation.timeout_secs, 10);
    }

    #[test]
    fn escalation_contact_parses_with_defaults() {
        let json = r#"{
            "webhook_url": "https://example.test/alert",
            "contact": { "name": "Ana", "email": "ana@example.test" }
        }"#;
        let cfg: EscalationConfig = serde_json::from_str(json).expect("parse");
        let contact = cfg.contact.expect("contact");
        assert!(contact.enabled);
        assert!(contact.phone.is_none());
    }
}
