//! ML Classifier Integration Tests
//!
//! Runs the real food / not-food DistilBERT model from HuggingFace.
//! These need network access and are skipped unless
//! `FOODCHECK_RUN_EXTERNAL_ML_TESTS=1` is set.

use foodcheck_classifiers::{ClassifierAdapter, ClassifierConfig, DevicePreference};

fn external_ml_tests_enabled() -> bool {
    std::env::var("FOODCHECK_RUN_EXTERNAL_ML_TESTS")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn load_adapter() -> ClassifierAdapter {
    let config = ClassifierConfig::default().with_device(DevicePreference::Cpu);
    ClassifierAdapter::load(&config).expect("Failed to load food / not-food model")
}

#[tokio::test]
async fn test_food_sentence() {
    if !external_ml_tests_enabled() {
        return;
    }
    let adapter = load_adapter();

    let result = adapter
        .classify("A delicious photo of a plate of scrambled eggs, bacon and toast.")
        .await
        .unwrap();

    let food = result.get("food").unwrap();
    let not_food = result.get("not_food").unwrap();
    assert!(food > not_food, "expected food to win, got {:?}", result);
}

#[tokio::test]
async fn test_not_food_sentence() {
    if !external_ml_tests_enabled() {
        return;
    }
    let adapter = load_adapter();

    let result = adapter
        .classify("I whipped up a fresh batch of code, but it seems to have a syntax error.")
        .await
        .unwrap();

    let food = result.get("food").unwrap();
    let not_food = result.get("not_food").unwrap();
    assert!(not_food > food, "expected not_food to win, got {:?}", result);
}

#[tokio::test]
async fn test_label_set_and_probabilities() {
    if !external_ml_tests_enabled() {
        return;
    }
    let adapter = load_adapter();

    for text in ["", "Pasta night!", "The meeting moved to Thursday."] {
        let result = adapter.classify(text).await.unwrap();

        let mut labels: Vec<&str> = result.labels().collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["food", "not_food"]);

        for (_, score) in result.iter() {
            assert!((0.0..=1.0).contains(&score));
        }
        assert!(
            (result.total() - 1.0).abs() < 1e-3,
            "scores should sum to ~1.0, got {}",
            result.total()
        );
    }
}

#[tokio::test]
async fn test_deterministic_inference() {
    if !external_ml_tests_enabled() {
        return;
    }
    let adapter = load_adapter();
    let text = "Freshly baked sourdough bread";

    let first = adapter.classify(text).await.unwrap();
    let second = adapter.classify(text).await.unwrap();

    for (label, score) in first.iter() {
        let again = second.get(label).unwrap();
        assert!((score - again).abs() < 1e-5);
    }
}

#[tokio::test]
async fn test_long_input_truncation() {
    if !external_ml_tests_enabled() {
        return;
    }
    let adapter = load_adapter();

    let long_text = "A plate of eggs and toast. ".repeat(400);
    let result = adapter.classify(&long_text).await;
    assert!(result.is_ok(), "Long input should be truncated: {:?}", result.err());
}
