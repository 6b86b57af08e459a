//! Core types for Foodcheck

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One `(label, score)` record as produced by an inference backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Class label (e.g. "food", "not_food")
    pub label: String,

    /// Probability assigned to the label (0.0-1.0)
    pub score: f32,
}

impl LabelScore {
    /// Create a new label/score record
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Label -> probability mapping returned by the classifier adapter.
///
/// Keys are unique and iteration order carries no meaning. Use
/// [`ClassificationResult::ranked`] for a deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResult {
    scores: HashMap<String, f32>,
}

impl ClassificationResult {
    /// Build a mapping from an ordered sequence of label/score records.
    ///
    /// When the same label appears more than once the later record wins.
    pub fn from_scores(scores: impl IntoIterator<Item = LabelScore>) -> Self {
        let mut map = HashMap::new();
        for LabelScore { label, score } in scores {
            map.insert(label, score);
        }
        Self { scores: map }
    }

    /// Probability for a label, if present
    pub fn get(&self, label: &str) -> Option<f32> {
        self.scores.get(label).copied()
    }

    /// Number of labels in the mapping
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over the labels (unordered)
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    /// Iterate over `(label, probability)` pairs (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.scores.iter().map(|(label, score)| (label.as_str(), *score))
    }

    /// Sum of all probabilities
    pub fn total(&self) -> f32 {
        self.scores.values().sum()
    }

    /// Highest-scoring entry
    pub fn top_label(&self) -> Option<LabelScore> {
        self.ranked(1).into_iter().next()
    }

    /// Entries sorted by descending probability, truncated to `limit`.
    ///
    /// Ties are broken by label so the order is stable across calls.
    pub fn ranked(&self, limit: usize) -> Vec<LabelScore> {
        let mut entries: Vec<LabelScore> = self
            .scores
            .iter()
            .map(|(label, score)| LabelScore::new(label.clone(), *score))
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        entries.truncate(limit);
        entries
    }

    /// Consume the result and return the underlying map
    pub fn into_inner(self) -> HashMap<String, f32> {
        self.scores
    }
}

impl FromIterator<LabelScore> for ClassificationResult {
    fn from_iter<I: IntoIterator<Item = LabelScore>>(iter: I) -> Self {
        Self::from_scores(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassificationResult {
        ClassificationResult::from_scores(vec![
            LabelScore::new("food", 0.93),
            LabelScore::new("not_food", 0.07),
        ])
    }

    #[test]
    fn test_from_scores_builds_mapping() {
        let result = sample();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("food"), Some(0.93));
        assert_eq!(result.get("not_food"), Some(0.07));
        assert_eq!(result.get("drink"), None);
    }

    #[test]
    fn test_duplicate_labels_last_write_wins() {
        let result = ClassificationResult::from_scores(vec![
            LabelScore::new("food", 0.2),
            LabelScore::new("not_food", 0.8),
            LabelScore::new("food", 0.6),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("food"), Some(0.6));
    }

    #[test]
    fn test_ranked_orders_descending_and_truncates() {
        let result = ClassificationResult::from_scores(vec![
            LabelScore::new("a", 0.1),
            LabelScore::new("b", 0.6),
            LabelScore::new("c", 0.3),
        ]);

        let ranked = result.ranked(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].label, "b");
        assert_eq!(ranked[1].label, "c");

        assert_eq!(result.ranked(10).len(), 3);
        assert!(result.ranked(0).is_empty());
    }

    #[test]
    fn test_ranked_breaks_ties_by_label() {
        let result = ClassificationResult::from_scores(vec![
            LabelScore::new("not_food", 0.5),
            LabelScore::new("food", 0.5),
        ]);

        let ranked = result.ranked(2);
        assert_eq!(ranked[0].label, "food");
        assert_eq!(ranked[1].label, "not_food");
    }

    #[test]
    fn test_top_label_and_total() {
        let result = sample();
        assert_eq!(result.top_label().map(|s| s.label), Some("food".to_string()));
        assert!((result.total() - 1.0).abs() < 1e-6);

        assert!(ClassificationResult::default().top_label().is_none());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let result = ClassificationResult::from_scores(vec![LabelScore::new("food", 1.0)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "food": 1.0 }));
    }
}
