//! Foodcheck demo
//!
//! Serves a single-input form that classifies a sentence as food or not
//! food with a fine-tuned DistilBERT model.

use anyhow::Result;
use clap::Parser;
use foodcheck_classifiers::ClassifierAdapter;
use foodcheck_demo::cli::{Cli, Commands};
use foodcheck_demo::config::DemoConfig;
use foodcheck_demo::interface::Prediction;
use foodcheck_demo::server::run_server;
use foodcheck_demo::state::AppState;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model,
            port,
            address,
        } => {
            init_logging(model.verbose);

            let mut config = DemoConfig::load(&model)?;
            config.apply_server_overrides(address, port);
            let addr = config.server.socket_addr()?;

            let metrics_handle = init_metrics()?;

            println!();
            println!("  {}", config.interface.title);
            println!();
            println!("  Model:   {}", config.classifier.model_id);
            println!("  Device:  {}", config.classifier.device);
            println!();

            let adapter = load_adapter(&config).await?;
            let state = AppState::new(adapter, config.interface)
                .with_cors_origins(config.server.cors_origins())
                .with_metrics(metrics_handle);

            run_server(state, addr).await?;
        }

        Commands::Classify { model, text, top_k } => {
            init_logging(model.verbose);

            let config = DemoConfig::load(&model)?;
            let adapter = load_adapter(&config).await?;

            let result = adapter.classify(&text).await?;
            let top_k = top_k.unwrap_or(config.interface.num_top_classes);
            let prediction = Prediction::from_result(&result, top_k);

            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
    }

    Ok(())
}

/// Load the model once; every request shares the resulting adapter
async fn load_adapter(config: &DemoConfig) -> Result<ClassifierAdapter> {
    info!(
        model = %config.classifier.model_id,
        revision = %config.classifier.revision,
        device = %config.classifier.device,
        "Loading classifier"
    );

    let classifier_config = config.classifier.clone();
    let adapter =
        tokio::task::spawn_blocking(move || ClassifierAdapter::load(&classifier_config)).await??;

    info!(labels = ?adapter.labels(), "Classifier ready");
    Ok(adapter)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "foodcheck_demo=debug,foodcheck_classifiers=debug,tower_http=debug"
    } else {
        "foodcheck_demo=info,foodcheck_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and return the handle `/metrics` renders
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "foodcheck_requests_total",
        "Total number of prediction requests"
    );
    metrics::describe_counter!(
        "foodcheck_errors_total",
        "Total number of failed predictions"
    );
    metrics::describe_histogram!(
        "foodcheck_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

