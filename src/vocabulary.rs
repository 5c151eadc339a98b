// src/vocabulary.rs
//! Deployment emotion vocabulary: label set, neutral/crisis designations,
//! color lookup, heuristic keywords and crisis phrases. Loaded from TOML so a
//! deployment can swap the 28-label default for a smaller or slangier set
//! without touching code.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

pub const DEFAULT_VOCABULARY_PATH: &str = "config/vocabulary.toml";
pub const ENV_VOCABULARY_PATH: &str = "EMOTION_VOCABULARY_PATH";

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    let raw = include_str!("../config/vocabulary.toml");
    Vocabulary::from_toml_str(raw).expect("valid built-in vocabulary")
});

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct VocabularyRoot {
    vocabulary: VocabularySection,
    #[serde(default)]
    colors: HashMap<String, String>,
    #[serde(default)]
    keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    crisis_detection: CrisisSection,
    #[serde(default)]
    escalation: EscalationSection,
}

#[derive(Debug, Clone, Deserialize)]
struct VocabularySection {
    labels: Vec<String>,
    neutral: String,
    crisis: String,
    #[serde(default = "default_color")]
    default_color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CrisisSection {
    #[serde(default)]
    phrases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EscalationSection {
    #[serde(default)]
    negative_labels: Vec<String>,
    #[serde(default = "default_escalation_threshold")]
    threshold: f32,
}

impl Default for EscalationSection {
    fn default() -> Self {
        Self {
            negative_labels: Vec::new(),
            threshold: default_escalation_threshold(),
        }
    }
}

fn default_color() -> String {
    "#7f5af0".to_string()
}

fn default_escalation_threshold() -> f32 {
    0.7
}

/* ----------------------------
Compiled vocabulary
---------------------------- */

#[derive(Debug, Clone)]
pub struct Vocabulary {
    labels: Vec<String>,
    known: HashSet<String>,
    neutral: String,
    crisis: String,
    colors: HashMap<String, String>,
    default_color: String,
    /// BTreeMap so heuristic tie-breaking is deterministic across runs.
    keywords: BTreeMap<String, Vec<String>>,
    crisis_phrases: Vec<String>,
    negative_labels: HashSet<String>,
    escalation_threshold: f32,
}

impl Vocabulary {
    /// The embedded GoEmotions-flavored default.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load from `EMOTION_VOCABULARY_PATH` or `config/vocabulary.toml`,
    /// falling back to the embedded default when neither file exists.
    pub fn load() -> Self {
        let path = std::env::var(ENV_VOCABULARY_PATH)
            .unwrap_or_else(|_| DEFAULT_VOCABULARY_PATH.to_string());
        match Self::from_path(&path) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, %path, "vocabulary file not usable; using built-in");
                Self::builtin()
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: VocabularyRoot = toml::from_str(toml_str)?;

        if root.vocabulary.labels.is_empty() {
            anyhow::bail!("vocabulary must declare at least one label");
        }
        let known: HashSet<String> = root.vocabulary.labels.iter().cloned().collect();
        if !known.contains(&root.vocabulary.neutral) {
            anyhow::bail!(
                "neutral label `{}` is not in the label list",
                root.vocabulary.neutral
            );
        }
        if !known.contains(&root.vocabulary.crisis) {
            anyhow::bail!(
                "crisis label `{}` is not in the label list",
                root.vocabulary.crisis
            );
        }
        for key in root.keywords.keys() {
            if !known.contains(key) {
                anyhow::bail!("keyword table references unknown label `{key}`");
            }
        }
        for label in &root.escalation.negative_labels {
            if !known.contains(label) {
                anyhow::bail!("escalation table references unknown label `{label}`");
            }
        }
        if !(0.0..=1.0).contains(&root.escalation.threshold) {
            anyhow::bail!(
                "escalation threshold {} is outside [0, 1]",
                root.escalation.threshold
            );
        }

        // Crisis phrases are matched lower-cased; normalize once at load.
        let crisis_phrases = root
            .crisis_detection
            .phrases
            .iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            labels: root.vocabulary.labels,
            known,
            neutral: root.vocabulary.neutral,
            crisis: root.vocabulary.crisis,
            colors: root.colors,
            default_color: root.vocabulary.default_color,
            keywords: root.keywords,
            crisis_phrases,
            negative_labels: root.escalation.negative_labels.into_iter().collect(),
            escalation_threshold: root.escalation.threshold,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.known.contains(label)
    }

    pub fn neutral(&self) -> &str {
        &self.neutral
    }

    pub fn crisis_label(&self) -> &str {
        &self.crisis
    }

    /// Map an upstream label into this vocabulary: unknown labels become the
    /// designated neutral label.
    pub fn canonicalize<'a>(&'a self, label: &'a str) -> &'a str {
        if self.contains(label) {
            label
        } else {
            &self.neutral
        }
    }

    pub fn color_for(&self, label: &str) -> String {
        self.colors
            .get(label)
            .cloned()
            .unwrap_or_else(|| self.default_color.clone())
    }

    pub fn keywords(&self) -> &BTreeMap<String, Vec<String>> {
        &self.keywords
    }

    pub fn crisis_phrases(&self) -> &[String] {
        &self.crisis_phrases
    }

    /// Whether `label` counts toward the extremely-negative check.
    pub fn is_negative(&self, label: &str) -> bool {
        self.negative_labels.contains(label)
    }

    /// Minimum score an emotion must exceed before it is considered extreme.
    pub fn escalation_threshold(&self) -> f32 {
        self.escalation_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let v = Vocabulary::builtin();
        assert!(v.contains("joy"));
        assert!(v.contains("neutral"));
        assert_eq!(v.neutral(), "neutral");
        assert_eq!(v.crisis_label(), "distress");
        assert!(!v.crisis_phrases().is_empty());
        assert!(!v.keywords().is_empty());
    }

    #[test]
    fn canonicalize_maps_unknown_to_neutral() {
        let v = Vocabulary::builtin();
        assert_eq!(v.canonicalize("joy"), "joy");
        assert_eq!(v.canonicalize("bussin"), "neutral");
    }

    #[test]
    fn color_lookup_has_default() {
        let v = Vocabulary::builtin();
        assert_eq!(v.color_for("joy"), "#FFD43B");
        assert_eq!(v.color_for("not-a-label"), "#7f5af0");
    }

    #[test]
    fn rejects_neutral_outside_label_list() {
        let bad = r#"
[vocabulary]
labels = ["joy", "sadness"]
neutral = "neutral"
crisis = "joy"
"#;
        assert!(Vocabulary::from_toml_str(bad).is_err());
    }

    #[test]
    fn rejects_keyword_for_unknown_label() {
        let bad = r#"
[vocabulary]
labels = ["joy", "neutral"]
neutral = "neutral"
crisis = "neutral"

[keywords]
anger = ["mad"]
"#;
        assert!(Vocabulary::from_toml_str(bad).is_err());
    }

    #[test]
    fn builtin_declares_negative_labels() {
        let v = Vocabulary::builtin();
        assert!(v.is_negative("grief"));
        assert!(v.is_negative("sadness"));
        assert!(!v.is_negative("joy"));
        assert!((v.escalation_threshold() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn escalation_section_defaults_to_empty() {
        let small = r#"
[vocabulary]
labels = ["happy", "sad", "chill"]
neutral = "chill"
crisis = "sad"
"#;
        let v = Vocabulary::from_toml_str(small).expect("parse");
        assert!(!v.is_negative("sad"));
        assert!((v.escalation_threshold() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn rejects_negative_label_outside_label_list() {
        let bad = r#"
[vocabulary]
labels = ["joy", "neutral"]
neutral = "neutral"
crisis = "neutral"

[escalation]
negative_labels = ["grief"]
"#;
        assert!(Vocabulary::from_toml_str(bad).is_err());
    }

    #[test]
    fn small_vocabulary_parses() {
        let small = r##"
[vocabulary]
labels = ["happy", "sad", "chill"]
neutral = "chill"
crisis = "sad"

[colors]
happy = "#FFD43B"

[crisis_detection]
phrases = ["Want To Die"]
"##;
        let v = Vocabulary::from_toml_str(small).expect("load small set");
        assert_eq!(v.labels().len(), 3);
        assert_eq!(v.canonicalize("joy"), "chill");
        // Phrases normalized to lower case at load.
        assert_eq!(v.crisis_phrases(), &["want to die".to_string()]);
    }
}
