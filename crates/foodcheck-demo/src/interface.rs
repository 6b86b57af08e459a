//! Interface description for the web form and the shape of its output

use foodcheck_core::ClassificationResult;
use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "😋🙅🥑 Food or Not Food Text Classifier";

const DEFAULT_DESCRIPTION: &str = "A text classifier to determine if a sentence is about food or not food.

Fine-tuned from [DistilBERT](https://huggingface.co/distilbert/distilbert-base-uncased) on a [small dataset of food and not food text](https://huggingface.co/datasets/mrdbourke/learn_hf_food_not_food_image_captions).

See [source code](https://github.com/mrdbourke/learn-huggingface/blob/main/notebooks/hugging_face_text_classification_tutorial.ipynb).";

const DEFAULT_EXAMPLES: [&str; 2] = [
    "I whipped up a fresh batch of code, but it seems to have a syntax error.",
    "A delicious photo of a plate of scrambled eggs, bacon and toast.",
];

/// Static content and output settings for the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,

    /// Markdown description shown under the title
    #[serde(default = "default_description")]
    pub description: String,

    /// Example inputs that pre-fill the text box
    #[serde(default = "default_examples")]
    pub examples: Vec<String>,

    /// How many labels the output display shows
    #[serde(default = "default_num_top_classes")]
    pub num_top_classes: usize,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_examples() -> Vec<String> {
    DEFAULT_EXAMPLES.iter().map(|s| s.to_string()).collect()
}

fn default_num_top_classes() -> usize {
    2
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            examples: default_examples(),
            num_top_classes: default_num_top_classes(),
        }
    }
}

/// One row of the ranked label display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub label: String,
    pub confidence: f32,
}

/// What the form shows for a submission: the winning label and the top-N
/// confidences in descending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Option<String>,
    pub confidences: Vec<Confidence>,
}

impl Prediction {
    /// Rank a classification result and keep the `num_top_classes` best entries
    pub fn from_result(result: &ClassificationResult, num_top_classes: usize) -> Self {
        let confidences: Vec<Confidence> = result
            .ranked(num_top_classes)
            .into_iter()
            .map(|entry| Confidence {
                label: entry.label,
                confidence: entry.score,
            })
            .collect();

        Self {
            label: result.top_label().map(|entry| entry.label),
            confidences,
        }
    }
}
