// src/respond/template.rs
//! Tier 3: static templates. Deterministic, synchronous and total — this tier
//! is the chain's real guarantee of non-empty output. Branch selection is
//! keyed by (template family, intensity, style, mood shift); style changes
//! wording only.

use async_trait::async_trait;

use crate::types::Intensity;

use super::{Responder, ResponseContext, ResponseError, ResponseStyle};

pub struct TemplateResponder;

/// Coarse grouping of vocabulary labels into template families, so richer
/// vocabularies (GoEmotions) still land on a sensible sentence. Unknown
/// labels use the neutral family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFamily {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Love,
    Crisis,
    Neutral,
}

pub fn family_for(label: &str, is_crisis: bool) -> TemplateFamily {
    if is_crisis || label == "distress" {
        return TemplateFamily::Crisis;
    }
    match label {
        "joy" | "amusement" | "excitement" | "optimism" | "pride" | "relief" | "admiration"
        | "approval" | "gratitude" => TemplateFamily::Joy,
        "sadness" | "grief" | "disappointment" | "remorse" => TemplateFamily::Sadness,
        "anger" | "annoyance" | "disapproval" | "disgust" => TemplateFamily::Anger,
        "fear" | "nervousness" | "embarrassment" => TemplateFamily::Fear,
        "surprise" | "realization" | "confusion" | "curiosity" => TemplateFamily::Surprise,
        "love" | "caring" | "desire" => TemplateFamily::Love,
        _ => TemplateFamily::Neutral,
    }
}

/// Intensity qualifier folded into the sentence. Moderate reads unqualified.
fn qualifier(style: ResponseStyle, intensity: Intensity) -> &'static str {
    match (style, intensity) {
        (ResponseStyle::Empathetic, Intensity::High) => "very ",
        (ResponseStyle::Empathetic, Intensity::Low) => "somewhat ",
        (ResponseStyle::Empathetic, Intensity::Moderate) => "",
        (ResponseStyle::Slang, Intensity::High) => "super ",
        (ResponseStyle::Slang, Intensity::Low) => "kinda ",
        (ResponseStyle::Slang, Intensity::Moderate) => "",
    }
}

fn shift_prefix(style: ResponseStyle, from: &str, to: &str) -> String {
    match style {
        ResponseStyle::Empathetic => {
            format!("I notice your mood has shifted from {from} to {to}. ")
        }
        ResponseStyle::Slang => {
            format!("Okay wait, you went from {from} to {to} real quick. ")
        }
    }
}

fn body(family: TemplateFamily, style: ResponseStyle, q: &str) -> String {
    use ResponseStyle::*;
    use TemplateFamily::*;
    match (family, style) {
        (Joy, Empathetic) => format!(
            "I notice you're feeling {q}joyful. It's wonderful to see you in good spirits. \
             Would you like to share what's bringing you this happiness?"
        ),
        (Joy, Slang) => format!(
            "Yasss! You're {q}happy rn and that's a total vibe! Keep that energy up — wanna \
             share what's got you so hyped?"
        ),
        (Sadness, Empathetic) => format!(
            "I sense that you're feeling {q}sad. It's perfectly normal to feel down sometimes. \
             Would you like to talk about what's troubling you?"
        ),
        (Sadness, Slang) => format!(
            "Oof, I can tell you're {q}down bad rn. It's okay to not be okay. Wanna talk about \
             what's going on?"
        ),
        (Anger, Empathetic) => format!(
            "I can see that you're feeling {q}angry. Your feelings are valid, and it's \
             important to acknowledge them. Would you like to discuss what's frustrating you?"
        ),
        (Anger, Slang) => format!(
            "I see you're {q}pressed about something. That's valid! Let it out — what's got \
             you heated?"
        ),
        (Fear, Empathetic) => format!(
            "I notice you're experiencing {q}fear or anxiety. These feelings can be \
             challenging, but recognizing them is a positive step. Would you like to explore \
             what's causing this concern?"
        ),
        (Fear, Slang) => format!(
            "Ngl, seems like you're {q}stressed. We all get those anxiety vibes sometimes. \
             What's making you nervous?"
        ),
        (Surprise, Empathetic) => format!(
            "You seem {q}surprised. Unexpected events can certainly catch us off guard. Would \
             you like to talk more about what surprised you?"
        ),
        (Surprise, Slang) => format!(
            "Wait, you're {q}shook! That's wild! What's got you so surprised?"
        ),
        (Love, Empathetic) => format!(
            "I can see you're expressing {q}love or affection. These positive connections are \
             important in our lives. Would you like to share more about these feelings?"
        ),
        (Love, Slang) => format!(
            "You're giving {q}major heart-eyes energy! Love to see it! Who's got you feeling \
             all the feels?"
        ),
        // Crisis wording stays grounded in both registers; no slang flourish.
        (Crisis, Empathetic) | (Crisis, Slang) => {
            "What you're feeling sounds really heavy, and I'm glad you put it into words. You \
             deserve support right now — please consider reaching out to someone you trust or \
             a crisis line in your area. I'm here, and you can keep writing as long as it \
             helps."
                .to_string()
        }
        (Neutral, Empathetic) => format!(
            "I'm noticing a {q}neutral tone in your message. I'm here to listen if you'd like \
             to explore your thoughts further."
        ),
        (Neutral, Slang) => format!(
            "I'm picking up {q}chill vibes from you. What's on your mind? I'm all ears!"
        ),
    }
}

/// Pure rendering function: same inputs, same sentence. Exposed for tests.
pub fn render(
    family: TemplateFamily,
    intensity: Intensity,
    style: ResponseStyle,
    shift: Option<(&str, &str)>,
) -> String {
    let q = qualifier(style, intensity);
    let sentence = body(family, style, q);
    match shift {
        // The crisis sentence stands alone; a mood-shift preamble would
        // soften the safety message.
        Some(_) if family == TemplateFamily::Crisis => sentence,
        Some((from, to)) => format!("{}{}", shift_prefix(style, from, to), sentence),
        None => sentence,
    }
}

#[async_trait]
impl Responder for TemplateResponder {
    async fn respond(&self, ctx: &ResponseContext<'_>) -> Result<String, ResponseError> {
        let family = family_for(&ctx.emotion.label, ctx.emotion.is_crisis);
        Ok(render(family, ctx.intensity(), ctx.style, ctx.emotion_shift()))
    }

    fn tier_name(&self) -> &'static str {
        "template"
    }
}
