//! Configuration for the classifier adapter and model loading

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Hub identifier of the fine-tuned food / not-food DistilBERT model
pub const DEFAULT_MODEL_ID: &str =
    "shivajimallela/learn_hf_food_not_food_classifier-ditsilbert-base-uncased";

/// Configuration injected into the classifier adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Hugging Face repo id, or a path to a local model directory
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Hub revision (ignored for local models)
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Where to run inference
    #[serde(default)]
    pub device: DevicePreference,

    /// Maximum number of tokens fed to the model, special tokens included
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            revision: default_revision(),
            device: DevicePreference::default(),
            max_length: default_max_length(),
        }
    }
}

impl ClassifierConfig {
    /// Create a configuration for the given model id or local path
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Set device preference
    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// Set Hugging Face revision
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Set maximum sequence length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Work out where the model files come from.
    ///
    /// An existing directory is treated as a local model, anything else as a
    /// Hub repo id.
    pub fn source(&self) -> ModelSource {
        let path = PathBuf::from(&self.model_id);
        if path.is_dir() {
            ModelSource::Local { path }
        } else {
            ModelSource::HuggingFace {
                repo: self.model_id.clone(),
                revision: self.revision.clone(),
            }
        }
    }
}

/// Source location for model files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Directory on the local file system
    Local { path: PathBuf },

    /// Download from Hugging Face Hub
    HuggingFace { repo: String, revision: String },
}

/// Device selection preference.
///
/// Selection is a best-effort optimisation; results do not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Use an accelerator when one is available, otherwise the CPU
    #[default]
    Auto,
    /// Always run on the CPU
    Cpu,
    /// Require CUDA or Metal
    Accelerated,
}

impl DevicePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Accelerated => "accelerated",
        }
    }
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "accelerated" | "gpu" | "cuda" | "metal" => Ok(Self::Accelerated),
            other => Err(format!(
                "unknown device '{}' (expected auto, cpu or accelerated)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.revision, "main");
        assert_eq!(config.device, DevicePreference::Auto);
        assert_eq!(config.max_length, 512);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
model_id: "someone/other-model"
device: cpu
max_length: 128
"#;
        let config: ClassifierConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model_id, "someone/other-model");
        assert_eq!(config.revision, "main");
        assert_eq!(config.device, DevicePreference::Cpu);
        assert_eq!(config.max_length, 128);
    }

    #[test]
    fn test_parse_empty_yaml_uses_defaults() {
        let config: ClassifierConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_device_from_str() {
        assert_eq!("auto".parse::<DevicePreference>(), Ok(DevicePreference::Auto));
        assert_eq!("CPU".parse::<DevicePreference>(), Ok(DevicePreference::Cpu));
        assert_eq!(
            "cuda".parse::<DevicePreference>(),
            Ok(DevicePreference::Accelerated)
        );
        assert!("tpu".parse::<DevicePreference>().is_err());
    }

    #[test]
    fn test_hub_source() {
        let config = ClassifierConfig::new("distilbert-base-uncased").with_revision("v1");
        assert_eq!(
            config.source(),
            ModelSource::HuggingFace {
                repo: "distilbert-base-uncased".to_string(),
                revision: "v1".to_string(),
            }
        );
    }

    #[test]
    fn test_local_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClassifierConfig::new(dir.path().to_string_lossy());
        assert_eq!(
            config.source(),
            ModelSource::Local {
                path: dir.path().to_path_buf()
            }
        );
    }
}
