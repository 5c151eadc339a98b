// tests/resolver_total.rs
// Total-function guarantee: resolve() always returns a well-formed result,
// whatever the input and however broken the classifier is, and the fallback
// label comes solely from the heuristic keyword table.

use std::sync::Arc;

use nous_emotion_engine::classify::MockClassifier;
use nous_emotion_engine::{EmotionResolver, EmotionResult, ScoredEmotion, Vocabulary};

fn assert_well_formed(r: &EmotionResult) {
    assert!(!r.emotions.is_empty(), "distribution must be non-empty");
    let top = r
        .emotions
        .iter()
        .cloned()
        .reduce(|a, b| if b.score > a.score { b } else { a })
        .unwrap();
    assert_eq!(r.label, top.label, "label must match the top of emotions");
    assert!((r.score - top.score).abs() < 1e-6);
    assert!((0.0..=1.0).contains(&r.score), "score in [0,1], got {}", r.score);
}

#[tokio::test]
async fn always_well_formed_when_classifier_rejects() {
    let resolver = EmotionResolver::new(
        Arc::new(Vocabulary::builtin()),
        Arc::new(MockClassifier::failing()),
    );

    let inputs = [
        "",
        "   \n\t  ",
        "I am so happy and excited",
        "no keyword overlap whatsoever in this sentence about spreadsheets",
        "je ne sais pas ce que je ressens aujourd'hui",
        "日記を書いています",
    ];
    for text in inputs {
        let r = resolver.resolve(text).await;
        assert_well_formed(&r);
        assert!(!r.is_crisis);
    }

    let very_long = "a long rambling entry ".repeat(2_000);
    assert_well_formed(&resolver.resolve(&very_long).await);
}

#[tokio::test]
async fn fallback_label_is_driven_by_keywords_alone() {
    let resolver = EmotionResolver::new(
        Arc::new(Vocabulary::builtin()),
        Arc::new(MockClassifier::failing()),
    );

    let r = resolver.resolve("I am so happy and excited").await;
    assert_eq!(r.label, "joy");
    // "happy" and "excited" both sit in the joy row: 0.5 + 0.1 * 2.
    assert!((r.score - 0.7).abs() < 1e-6);
    assert!(r.is_fallback);

    let r = resolver.resolve("I am so happy today").await;
    assert_eq!(r.label, "joy");
    assert!((r.score - 0.6).abs() < 1e-6, "one match scores 0.6, got {}", r.score);
}

#[tokio::test]
async fn no_keyword_match_resolves_neutral_low_confidence() {
    let resolver = EmotionResolver::new(
        Arc::new(Vocabulary::builtin()),
        Arc::new(MockClassifier::failing()),
    );

    let r = resolver.resolve("the bus arrived at seven fifteen").await;
    assert_eq!(r.label, "neutral");
    assert!((r.score - 0.5).abs() < 1e-6);
    assert!(r.is_fallback);
}

#[tokio::test]
async fn success_path_preserves_the_full_distribution() {
    let mock = Arc::new(MockClassifier::returning(vec![
        ScoredEmotion::new("neutral", 0.05),
        ScoredEmotion::new("sadness", 0.91),
        ScoredEmotion::new("grief", 0.03),
    ]));
    let resolver = EmotionResolver::new(Arc::new(Vocabulary::builtin()), mock);

    let r = resolver.resolve("I can't stop crying, nothing feels right").await;
    assert_well_formed(&r);
    assert_eq!(r.label, "sadness");
    assert!((r.score - 0.91).abs() < 1e-6);
    assert!(!r.is_crisis);
    assert!(!r.is_fallback);
    assert_eq!(r.emotions.len(), 3, "full ranked list kept for UI detail");
}

#[tokio::test]
async fn unknown_labels_map_to_the_deployment_neutral() {
    let mock = Arc::new(MockClassifier::returning(vec![
        ScoredEmotion::new("delulu", 0.9),
        ScoredEmotion::new("joy", 0.1),
    ]));
    let resolver = EmotionResolver::new(Arc::new(Vocabulary::builtin()), mock);

    let r = resolver.resolve("whatever that means").await;
    assert_well_formed(&r);
    assert_eq!(r.label, "neutral");
}
