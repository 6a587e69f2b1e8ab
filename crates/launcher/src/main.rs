//! docker-config - load a configuration file and overlay the environment on it

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::{ConfigLoader, DockerConfig, OverlayOptions, StdEnv, VersionKeyPolicy, DEFAULT_PREFIX};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Overlay prefixed environment variables onto a configuration file and
/// print the result
#[derive(Debug, Parser)]
#[command(name = "docker-config", version, about)]
struct Args {
    /// Base configuration file (YAML or JSON)
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    config: PathBuf,

    /// Substring marking an environment variable as an override
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Use the expected-version variable for the version check only
    #[arg(long)]
    exclude_version_key: bool,

    /// Output format of the overlaid configuration
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl Args {
    fn overlay_options(&self) -> OverlayOptions {
        let policy = if self.exclude_version_key {
            VersionKeyPolicy::Exclude
        } else {
            VersionKeyPolicy::Overlay
        };
        OverlayOptions::default()
            .with_prefix(self.prefix.clone())
            .with_version_policy(policy)
    }
}

fn main() -> Result<()> {
    // Load .env before anything reads the environment
    let dotenv_result = dotenv::dotenv();

    let args = Args::parse();

    init_logging()?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Could not load .env file: {}", e),
    }

    info!("Starting docker-config v{}", env!("CARGO_PKG_VERSION"));

    let config = ConfigLoader::load(&args.config, &StdEnv, args.overlay_options())
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    info!("Configuration loaded from: {}", args.config.display());
    if config.report().has_warnings() {
        warn!("Some environment overrides were skipped, see warnings above");
    }

    println!("{}", render(&config, args.output, args.compact)?);
    Ok(())
}

/// Serialize the overlaid configuration for stdout
fn render(config: &DockerConfig, format: OutputFormat, compact: bool) -> Result<String> {
    match format {
        OutputFormat::Json if compact => {
            serde_json::to_string(config.tree()).context("Failed to serialize configuration")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(config.tree()).context("Failed to serialize configuration")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(config.tree()).context("Failed to serialize configuration")
        }
    }
}

/// Initialize logging based on environment variables
///
/// Logs go to stderr so stdout only carries the configuration.
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

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
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    if log_level == "trace" || log_level == "debug" {
        warn!("Debug/trace logging enabled - coercion details will be logged");
    }

    Ok(())
}
