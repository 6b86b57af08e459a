//! DistilBERT sequence-classification backend built on Candle

use crate::classifier::InferenceBackend;
use crate::config::ClassifierConfig;
use crate::model_loader::{
    device_name, load_tokenizer, load_var_builder, resolve_model_files, select_device, HeadConfig,
};
use async_trait::async_trait;
use candle_core::{Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use foodcheck_core::{Error, LabelScore, Result};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Candle DistilBERT model with its classification head.
///
/// Cloning is cheap; all clones share the same loaded weights.
#[derive(Clone)]
pub struct DistilBertBackend {
    inner: Arc<DistilBertSequenceClassifier>,
}

struct DistilBertSequenceClassifier {
    model_id: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
}

impl DistilBertBackend {
    /// Resolve, download and load the model described by `config`.
    ///
    /// This is the expensive step; do it once and share the backend.
    pub fn load(config: &ClassifierConfig) -> Result<Self> {
        let start = Instant::now();
        tracing::info!("Loading DistilBERT classifier '{}'", config.model_id);

        let files = resolve_model_files(&config.source())?;
        let tokenizer = load_tokenizer(&files.tokenizer, config.max_length)?;

        let config_str = std::fs::read_to_string(&files.config).map_err(|e| {
            Error::classifier(format!(
                "Failed to read config {}: {}",
                files.config.display(),
                e
            ))
        })?;
        let head = HeadConfig::from_json(&config_str)?;
        let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::classifier(format!("Failed to parse config: {}", e)))?;
        let labels = head.labels()?;

        let device = select_device(config.device)?;
        tracing::info!("Using device: {}", device_name(&device));

        let vb = load_var_builder(&files.weights, &device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(|e| Error::classifier(format!("Failed to load DistilBERT model: {}", e)))?;

        let pre_classifier = candle_nn::linear(head.dim, head.dim, vb.pp("pre_classifier"))
            .map_err(|e| Error::classifier(format!("Failed to load pre_classifier: {}", e)))?;

        let classifier = candle_nn::linear(head.dim, labels.len(), vb.pp("classifier"))
            .map_err(|e| {
                Error::classifier(format!("Failed to load classification head: {}", e))
            })?;

        tracing::info!(
            "Loaded DistilBERT classifier with {} labels {:?} in {:?}",
            labels.len(),
            labels,
            start.elapsed()
        );

        Ok(Self {
            inner: Arc::new(DistilBertSequenceClassifier {
                model_id: config.model_id.clone(),
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
            }),
        })
    }

    /// Run inference on the calling thread
    pub fn infer_blocking(&self, text: &str) -> Result<Vec<LabelScore>> {
        self.inner.infer(text)
    }
}

#[async_trait]
impl InferenceBackend for DistilBertBackend {
    async fn infer(&self, text: &str) -> Result<Vec<LabelScore>> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || inner.infer(&text))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))?
    }

    fn model_id(&self) -> &str {
        &self.inner.model_id
    }

    fn labels(&self) -> &[String] {
        &self.inner.labels
    }
}

impl DistilBertSequenceClassifier {
    fn infer(&self, text: &str) -> Result<Vec<LabelScore>> {
        let start = Instant::now();

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create input tensor: {}", e)))?;

        // DistilBERT masks positions where the mask is 1, the inverse of the tokenizer's convention
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create attention mask: {}", e)))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let cls_embedding = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to get CLS token: {}", e)))?;

        let pooled = self
            .pre_classifier
            .forward(&cls_embedding)
            .and_then(|t| t.relu())
            .map_err(|e| Error::classifier(format!("Pre-classifier failed: {}", e)))?;

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| Error::classifier(format!("Softmax failed: {}", e)))?;

        tracing::debug!(
            tokens = encoding.get_ids().len(),
            latency_us = start.elapsed().as_micros() as u64,
            "DistilBERT inference complete"
        );

        Ok(self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, score)| LabelScore::new(label.clone(), score))
            .collect())
    }
}
