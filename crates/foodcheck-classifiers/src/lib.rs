//! Foodcheck Classifiers
//!
//! The classifier adapter that turns a sentence into food / not-food
//! probabilities.
//!
//! Inference runs on [Candle](https://github.com/huggingface/candle) with a
//! DistilBERT sequence-classification model pulled from the Hugging Face Hub
//! (or a local directory). The model is loaded once and shared read-only
//! across requests.

pub mod adapter;
pub mod classifier;
pub mod config;
pub mod distilbert;
pub mod model_loader;

pub use adapter::ClassifierAdapter;
pub use classifier::InferenceBackend;
pub use config::{ClassifierConfig, DevicePreference, ModelSource, DEFAULT_MODEL_ID};
pub use distilbert::DistilBertBackend;
pub use model_loader::{HeadConfig, ModelFiles};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::ClassifierAdapter;
    pub use crate::classifier::InferenceBackend;
    pub use crate::config::{ClassifierConfig, DevicePreference};
    pub use foodcheck_core::{ClassificationResult, LabelScore};
}
