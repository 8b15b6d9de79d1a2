//! iseq-prof-analysis - command line entry point

use anyhow::{Context, Result};
use baseline::BaselineLayout;
use clap::{Parser, Subcommand};
use config::variant::GENERIC_TAG;
use iseq_prof_analysis::{load_config, version, Config, ConfigLoader, Dataset};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "iseq-prof-analysis", about = "Profile analysis configuration toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a configuration, install it and print it
    Show {
        /// Dataset selector (baseline, chlamydia); defaults to the file's `dataset`
        #[arg(long)]
        dataset: Option<String>,
        /// Configuration file, defaults to $ISEQ_CONFIG_PATH or config.yaml
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Write an example configuration file
    Init {
        /// Dataset selector (baseline, chlamydia); generic when omitted
        #[arg(long)]
        dataset: Option<String>,
        path: PathBuf,
    },
    /// Print the artifact layout of a baseline configuration
    Plan {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the package version
    Version,
}

fn main() -> Result<()> {
    // Load .env file if it exists, before logging reads RUST_LOG
    let dotenv_result = dotenv::dotenv();

    // Initialize logging
    init_logging()?;

    match dotenv_result {
        // Only warn if the error is not "file not found"
        Err(e) if !e.to_string().contains("No such file or directory") => {
            warn!("Could not load .env file: {}", e);
        }
        Err(_) => {}
        Ok(_) => info!("Loaded environment variables from .env file"),
    }

    let cli = Cli::parse();
    info!("Starting iseq-prof-analysis v{}", version());

    match cli.command {
        Command::Show {
            dataset,
            config,
            json,
        } => {
            let config = load(dataset.as_deref(), config)?;
            let output = if json {
                serde_json::to_string_pretty(&*config).context("Failed to serialize configuration")?
            } else {
                ConfigLoader::to_yaml(&config)?
            };
            println!("{}", output);
        }
        Command::Init { dataset, path } => {
            let dataset = dataset
                .as_deref()
                .map(str::parse::<Dataset>)
                .transpose()
                .context("Invalid dataset selector")?;
            ConfigLoader::create_example(dataset, &path)
                .context("Failed to create example configuration")?;
            info!("Example configuration written to: {}", path.display());
        }
        Command::Plan { config } => {
            load(Some(Dataset::Baseline.as_str()), config)?;
            let layout = BaselineLayout::from_shared()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&layout).context("Failed to serialize layout")?
            );
        }
        Command::Version => println!("{}", version()),
    }

    Ok(())
}

/// Load the configuration file, installing it when a selector is known
///
/// An explicit selector always goes through `load_config`, so `generic`
/// and unknown names fail there. Only a file tagged `generic` (or not
/// tagged at all) is loaded without being installed.
fn load(selector: Option<&str>, config_path: Option<PathBuf>) -> Result<Arc<Config>> {
    let config_path = config_path
        .or_else(|| env::var_os("ISEQ_CONFIG_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    let figment = ConfigLoader::figment(&config_path).context("Failed to load configuration")?;
    let selector = match selector {
        Some(selector) => Some(selector.to_string()),
        None => figment
            .extract_inner::<String>("dataset")
            .ok()
            .filter(|tag| !tag.trim().eq_ignore_ascii_case(GENERIC_TAG)),
    };

    let config = match selector {
        Some(selector) => {
            load_config(&selector, figment).context("Failed to load configuration")?
        }
        None => {
            warn!("No dataset selected, configuration is not installed");
            let config = ConfigLoader::load(&config_path, None)
                .context("Failed to load configuration")?;
            Arc::new(config)
        }
    };

    info!("Configuration loaded from: {}", config_path.display());
    info!("Dataset: {}", config.name());
    info!("Dataset root: {}", config.dataset_root().display());
    Ok(config)
}

/// Initialize logging based on environment variables
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    // Logs go to stderr so printed configurations stay machine-readable
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    info!("Logging initialized");
    info!("Log level: {}", log_level);
    info!("Log format: {}", log_format);

    Ok(())
}
