//! Model file resolution, device selection and weight loading for Candle

use crate::config::{DevicePreference, ModelSource};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use foodcheck_core::{Error, Result};
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

const TOKENIZER_FILES: [&str; 2] = ["tokenizer.json", "vocab.txt"];
const WEIGHT_FILES: [&str; 2] = ["model.safetensors", "pytorch_model.bin"];

/// Paths to the files making up a sequence-classification model
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// `config.json`
    pub config: PathBuf,

    /// `tokenizer.json`, or `vocab.txt` for WordPiece-only checkpoints
    pub tokenizer: PathBuf,

    /// `model.safetensors` or `pytorch_model.bin`
    pub weights: PathBuf,
}

/// Locate (and download if needed) the files for a model
pub fn resolve_model_files(source: &ModelSource) -> Result<ModelFiles> {
    match source {
        ModelSource::Local { path } => resolve_local(path),
        ModelSource::HuggingFace { repo, revision } => resolve_hub(repo, revision),
    }
}

fn resolve_local(dir: &Path) -> Result<ModelFiles> {
    if !dir.is_dir() {
        return Err(Error::classifier(format!(
            "Model path does not exist: {}",
            dir.display()
        )));
    }

    let config = dir.join("config.json");
    if !config.exists() {
        return Err(Error::classifier(format!(
            "config.json not found in {}",
            dir.display()
        )));
    }

    let existing = |name: &str| Some(dir.join(name)).filter(|p| p.exists());

    let tokenizer = first_available(&TOKENIZER_FILES, existing).ok_or_else(|| {
        Error::classifier(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
            dir.display()
        ))
    })?;

    let weights = first_available(&WEIGHT_FILES, existing).ok_or_else(|| {
        Error::classifier(format!(
            "No model weights found in {} (tried model.safetensors, pytorch_model.bin)",
            dir.display()
        ))
    })?;

    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

fn resolve_hub(repo_id: &str, revision: &str) -> Result<ModelFiles> {
    tracing::info!("Resolving model from HuggingFace: {} @ {}", repo_id, revision);

    let api = Api::new().map_err(|e| {
        Error::classifier(format!("Failed to initialize HuggingFace API: {}", e))
    })?;

    let repo = api.repo(Repo::with_revision(
        repo_id.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    let config = repo.get("config.json").map_err(|e| {
        Error::classifier(format!("Failed to download config.json from {}: {}", repo_id, e))
    })?;

    let fetch = |name: &str| match repo.get(name) {
        Ok(path) => {
            tracing::debug!("Found {}", name);
            Some(path)
        }
        Err(e) => {
            tracing::debug!("{} not available: {}", name, e);
            None
        }
    };

    let tokenizer = first_available(&TOKENIZER_FILES, fetch).ok_or_else(|| {
        Error::classifier(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
            repo_id
        ))
    })?;

    let weights = first_available(&WEIGHT_FILES, fetch).ok_or_else(|| {
        Error::classifier(format!(
            "No model weights found in {} (tried model.safetensors, pytorch_model.bin)",
            repo_id
        ))
    })?;

    tracing::info!("Model files available at: {}", weights.display());

    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

fn first_available(
    candidates: &[&str],
    mut lookup: impl FnMut(&str) -> Option<PathBuf>,
) -> Option<PathBuf> {
    candidates.iter().find_map(|name| lookup(name))
}

/// Pick a Candle device for the given preference
pub fn select_device(preference: DevicePreference) -> Result<Device> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Auto => match accelerator() {
            Some(Ok(device)) => Ok(device),
            Some(Err(e)) => {
                tracing::warn!("Accelerator present but unusable, falling back to CPU: {}", e);
                Ok(Device::Cpu)
            }
            None => Ok(Device::Cpu),
        },
        DevicePreference::Accelerated => accelerator().unwrap_or_else(|| {
            Err(Error::config(
                "accelerated device requested but neither CUDA nor Metal is available",
            ))
        }),
    }
}

fn accelerator() -> Option<Result<Device>> {
    if candle_core::utils::cuda_is_available() {
        return Some(Device::new_cuda(0).map_err(|e| {
            Error::classifier(format!("Failed to initialize CUDA: {}", e))
        }));
    }

    if candle_core::utils::metal_is_available() {
        return Some(Device::new_metal(0).map_err(|e| {
            Error::classifier(format!("Failed to initialize Metal: {}", e))
        }));
    }

    None
}

/// Short name of a device for logs and health output
pub fn device_name(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

/// Classification-head fields read from `config.json`
#[derive(Debug, Clone, Deserialize)]
pub struct HeadConfig {
    /// Hidden size of the encoder
    #[serde(default = "default_dim")]
    pub dim: usize,

    /// Label names keyed by stringified class index
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

fn default_dim() -> usize {
    768
}

impl HeadConfig {
    /// Read the head configuration from a `config.json` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::classifier(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse the head configuration from `config.json` contents
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::classifier(format!("Failed to parse config: {}", e)))
    }

    /// Labels in class-index order.
    ///
    /// Missing indices get the `LABEL_<n>` name transformers uses by default;
    /// a config without `id2label` is treated as binary.
    pub fn labels(&self) -> Result<Vec<String>> {
        if self.id2label.is_empty() {
            return Ok(vec!["LABEL_0".to_string(), "LABEL_1".to_string()]);
        }

        let mut indexed = HashMap::with_capacity(self.id2label.len());
        for (id, label) in &self.id2label {
            let idx: usize = id.trim().parse().map_err(|_| {
                Error::classifier(format!("Invalid id in id2label: '{}'", id))
            })?;
            indexed.insert(idx, label.clone());
        }

        let num_labels = indexed.keys().max().map_or(0, |max| max + 1);
        Ok((0..num_labels)
            .map(|idx| {
                indexed
                    .remove(&idx)
                    .unwrap_or_else(|| format!("LABEL_{}", idx))
            })
            .collect())
    }
}

/// Load a tokenizer and cap its output at `max_length` tokens
pub fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = if path.file_name().is_some_and(|name| name == "vocab.txt") {
        tracing::debug!("Building tokenizer from vocab.txt");
        wordpiece_tokenizer(path)?
    } else {
        tracing::debug!("Loading tokenizer from {}", path.display());
        Tokenizer::from_file(path)
            .map_err(|e| Error::classifier(format!("Failed to load tokenizer: {}", e)))?
    };

    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::classifier(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

fn wordpiece_tokenizer(vocab_path: &Path) -> Result<Tokenizer> {
    use tokenizers::models::wordpiece::WordPiece;
    use tokenizers::normalizers::BertNormalizer;
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::processors::bert::BertProcessing;

    let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::classifier(format!("Failed to build WordPiece model: {}", e)))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

    let sep_id = tokenizer.token_to_id("[SEP]").unwrap_or(102);
    let cls_id = tokenizer.token_to_id("[CLS]").unwrap_or(101);
    tokenizer.with_post_processor(Some(BertProcessing::new(
        ("[SEP]".to_string(), sep_id),
        ("[CLS]".to_string(), cls_id),
    )));

    Ok(tokenizer)
}

/// Load model weights into a VarBuilder on `device`
pub fn load_var_builder(weights: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let is_safetensors = weights
        .extension()
        .is_some_and(|ext| ext == "safetensors");

    if is_safetensors {
        // SAFETY: the weight file is not modified while mapped.
        unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)
                .map_err(|e| Error::classifier(format!("Failed to load SafeTensors: {}", e)))
        }
    } else {
        VarBuilder::from_pth(weights, DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load PyTorch weights: {}", e)))
    }
}
