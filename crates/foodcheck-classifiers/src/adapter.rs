//! Classifier adapter: text in, label -> probability mapping out

use crate::classifier::InferenceBackend;
use crate::config::ClassifierConfig;
use crate::distilbert::DistilBertBackend;
use foodcheck_core::{ClassificationResult, Result};
use std::sync::Arc;
use std::time::Instant;

/// Wraps a loaded inference backend behind a single `classify` operation.
///
/// The backend is acquired once and shared read-only by every clone of the
/// adapter; it is released when the last clone is dropped.
#[derive(Clone)]
pub struct ClassifierAdapter {
    backend: Arc<dyn InferenceBackend>,
}

impl ClassifierAdapter {
    /// Create an adapter over an already-loaded backend
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Load the Candle DistilBERT backend described by `config`.
    ///
    /// Blocks while the model is downloaded and mapped.
    pub fn load(config: &ClassifierConfig) -> Result<Self> {
        let backend = DistilBertBackend::load(config)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Classify `text` into a label -> probability mapping.
    ///
    /// The text is handed to the backend unchanged, including the empty
    /// string. Backend failures are returned as-is.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let scores = self.backend.infer(text).await?;
        let result = ClassificationResult::from_scores(scores);

        tracing::debug!(
            model = self.backend.model_id(),
            chars = text.chars().count(),
            latency_us = start.elapsed().as_micros() as u64,
            "Classified text"
        );

        Ok(result)
    }

    /// Identifier of the underlying model
    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    /// Labels the underlying model can produce
    pub fn labels(&self) -> &[String] {
        self.backend.labels()
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model_id", &self.model_id())
            .field("labels", &self.labels())
            .finish()
    }
}
