// src/lib.rs
// Public library surface for the journaling UI and integration tests.

pub mod bootstrap;
pub mod classify;
pub mod config;
pub mod crisis;
pub mod heuristic;
pub mod journal;
pub mod resolver;
pub mod respond;
pub mod safety;
pub mod types;
pub mod vocabulary;

// ---- Re-exports for stable public API ----
pub use crate::bootstrap::EmotionEngine;
pub use crate::classify::{build_classifier, Classifier, ClassifierError, DynClassifier};
pub use crate::config::{EmergencyContact, EngineConfig, EscalationConfig};
pub use crate::journal::JournalStore;
pub use crate::resolver::EmotionResolver;
pub use crate::respond::{Responder, ResponseContext, ResponseGenerator, ResponseStyle};
pub use crate::safety::{comforting_message, is_extremely_negative, EmergencyEscalator};
pub use crate::types::{
    ConversationMessage, EmotionResult, Intensity, JournalEntry, Role, ScoredEmotion,
};
pub use crate::vocabulary::Vocabulary;
