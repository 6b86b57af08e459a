//! Inference backend trait

use async_trait::async_trait;
use foodcheck_core::{LabelScore, Result};

/// The inference capability behind the classifier adapter.
///
/// Implementations map a piece of text to one score per known label, in the
/// model's label order. They are loaded once and shared read-only, so they
/// must be safe to call from many requests at the same time.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Score `text` against every label the model knows about
    async fn infer(&self, text: &str) -> Result<Vec<LabelScore>>;

    /// Identifier of the loaded model (Hub repo id or local path)
    fn model_id(&self) -> &str;

    /// Labels in model order
    fn labels(&self) -> &[String];
}
