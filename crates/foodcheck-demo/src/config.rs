//! Demo configuration

use crate::cli::ModelArgs;
use crate::interface::InterfaceConfig;
use foodcheck_classifiers::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Demo configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Model and device settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Form content and output shape
    #[serde(default)]
    pub interface: InterfaceConfig,
}

impl DemoConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(args: &ModelArgs) -> anyhow::Result<Self> {
        let mut config = if args.config.exists() {
            Self::from_file(&args.config)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                args.config.display()
            );
            Self::default()
        };

        config.apply_model_overrides(args);
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply model-related CLI overrides
    pub fn apply_model_overrides(&mut self, args: &ModelArgs) {
        if let Some(model) = &args.model {
            self.classifier.model_id = model.clone();
        }

        if let Some(revision) = &args.revision {
            self.classifier.revision = revision.clone();
        }

        if let Some(device) = args.device {
            self.classifier.device = device;
        }
    }

    /// Apply listener CLI overrides
    pub fn apply_server_overrides(&mut self, address: Option<String>, port: Option<u16>) {
        if let Some(address) = address {
            self.server.address = address;
        }

        if let Some(port) = port {
            self.server.port = port;
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_address")]
    pub address: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.address, self.port).parse()?)
    }

    /// Browser origins that may call the API on this listener.
    ///
    /// Loopback origins on the configured port are always allowed; a
    /// specific non-loopback address is allowed as well.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![
            format!("http://localhost:{}", self.port),
            format!("http://127.0.0.1:{}", self.port),
        ];

        let host = match self.address.parse::<IpAddr>() {
            Ok(ip) if ip.is_unspecified() || ip.is_loopback() => None,
            Ok(IpAddr::V6(ip)) => Some(format!("[{}]", ip)),
            Ok(IpAddr::V4(ip)) => Some(ip.to_string()),
            Err(_) if self.address == "localhost" => None,
            Err(_) => Some(self.address.clone()),
        };

        if let Some(host) = host {
            origins.push(format!("http://{}:{}", host, self.port));
        }

        origins
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7860
}
