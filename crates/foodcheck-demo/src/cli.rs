use clap::{Args, Parser, Subcommand};
use foodcheck_classifiers::DevicePreference;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foodcheck-demo")]
#[command(
    author,
    version,
    about = "Food or not food? A DistilBERT text classifier demo"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI and JSON API
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Listen port
        #[arg(short, long, env = "FOODCHECK_PORT")]
        port: Option<u16>,

        /// Listen address
        #[arg(short, long, env = "FOODCHECK_ADDRESS")]
        address: Option<String>,
    },

    /// Classify a single sentence and print the scores as JSON
    Classify {
        #[command(flatten)]
        model: ModelArgs,

        /// Text to classify
        text: String,

        /// Number of top labels to print (defaults to the interface setting)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

/// Options shared by every command that loads the model
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = "foodcheck.yaml", env = "FOODCHECK_CONFIG")]
    pub config: PathBuf,

    /// Hugging Face model id or local model directory
    #[arg(short, long, env = "FOODCHECK_MODEL")]
    pub model: Option<String>,

    /// Hugging Face revision
    #[arg(long, env = "FOODCHECK_REVISION")]
    pub revision: Option<String>,

    /// Device: auto, cpu or accelerated
    #[arg(short, long, env = "FOODCHECK_DEVICE", value_parser = parse_device)]
    pub device: Option<DevicePreference>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_device(s: &str) -> Result<DevicePreference, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["foodcheck-demo", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                model,
                port,
                address,
            } => {
                assert_eq!(model.config, PathBuf::from("foodcheck.yaml"));
                assert!(model.model.is_none());
                assert!(model.device.is_none());
                assert!(!model.verbose);
                assert!(port.is_none());
                assert!(address.is_none());
            }
            other => panic!("Expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "foodcheck-demo",
            "serve",
            "--port",
            "9000",
            "--address",
            "0.0.0.0",
            "--device",
            "cpu",
            "--model",
            "./models/food",
            "-v",
        ])
        .unwrap();

        let Commands::Serve {
            model,
            port,
            address,
        } = cli.command
        else {
            panic!("Expected serve");
        };
        assert_eq!(port, Some(9000));
        assert_eq!(address.as_deref(), Some("0.0.0.0"));
        assert_eq!(model.device, Some(DevicePreference::Cpu));
        assert_eq!(model.model.as_deref(), Some("./models/food"));
        assert!(model.verbose);
    }

    #[test]
    fn test_parse_classify() {
        let cli =
            Cli::try_parse_from(["foodcheck-demo", "classify", "Pancakes!", "-k", "1"]).unwrap();

        let Commands::Classify { text, top_k, .. } = cli.command else {
            panic!("Expected classify");
        };
        assert_eq!(text, "Pancakes!");
        assert_eq!(top_k, Some(1));
    }

    #[test]
    fn test_rejects_unknown_device() {
        let result = Cli::try_parse_from(["foodcheck-demo", "serve", "--device", "tpu"]);
        assert!(result.is_err());
    }
}
