use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_labeler::config::{Config, DEFAULT_CONFIG_FILE};
use gcp_labeler::gcp::auth::GcpCredentials;
use gcp_labeler::gcp::client::{Endpoints, GcpClient};
use gcp_labeler::provider::ProviderRegistry;
use gcp_labeler::run::{run_batch, FailurePolicy};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Bulk apply labels to GCP assets
#[derive(Parser, Debug)]
#[command(name = "gcp-labeler", version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// GCP project to label (overrides project_id in the config file)
    #[arg(short, long)]
    project: Option<String>,

    /// Keep processing remaining assets after one fails
    #[arg(long)]
    keep_going: bool,

    /// Use this access token instead of Application Default Credentials
    #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Log file (defaults to the user config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = log_file.unwrap_or_else(get_log_path);

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-labeler started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcp-labeler").join("gcp-labeler.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-labeler").join("gcp-labeler.log");
    }
    PathBuf::from("gcp-labeler.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level, args.log_file.clone())?;

    let settings = Config::from_file(&args.config)?.resolve(args.project.as_deref())?;

    let client = match &args.access_token {
        Some(token) => {
            GcpClient::with_credentials(GcpCredentials::from_token(token), Endpoints::default())?
        }
        None => GcpClient::new().await?,
    };
    let registry = ProviderRegistry::new(client);

    let failure_policy = if args.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let summary = run_batch(&registry, &settings, failure_policy).await?;

    if !summary.is_success() {
        // exit() skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}
