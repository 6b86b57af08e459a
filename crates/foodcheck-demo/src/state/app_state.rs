use crate::config::ServerConfig;
use crate::interface::InterfaceConfig;
use foodcheck_classifiers::ClassifierAdapter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Classifier adapter over the model loaded at startup
    pub adapter: ClassifierAdapter,

    /// Form content and output settings
    pub interface: Arc<InterfaceConfig>,

    /// Prometheus handle for `/metrics`, when a recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,

    /// Origins the CORS layer accepts
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(adapter: ClassifierAdapter, interface: InterfaceConfig) -> Self {
        Self {
            adapter,
            interface: Arc::new(interface),
            metrics_handle: None,
            cors_origins: ServerConfig::default().cors_origins(),
        }
    }

    /// Accept browser requests from the origins of the configured listener
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Attach the handle used to render `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
