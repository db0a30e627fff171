//! This module handles the initial setup of the application.
use super::args::AppArgs;
use crate::credentials::{self, CredentialsError};
use crate::logging::{
    AnsiPalette, Classifier, ConsoleRelay, Formatter, LogBuffer, LogLevel, LogSink, Logger,
    LoggerConfig, LoggerOptions, RelayLayer, StdioSink, TeeSink,
};
use crate::menu::CommandContext;
use crate::network::{AgentNetwork, InMemoryNetwork};
use crate::tools::{InitiateConnectionTool, ToolRegistry, WeatherTool};
use crate::types::AgentCredentials;
use anyhow::{anyhow, Context, Result};
use std::io::IsTerminal;
use std::sync::Arc;

/// Number of formatted lines kept for the `logs` command.
const LOG_BUFFER_SIZE: usize = 500;

/// Contains all the necessary components for the application to run.
///
/// This struct is created by the `prepare` function and handed to either the
/// one-shot registration or the menu loop.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    /// Shared services for the menu commands.
    pub context: CommandContext,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Builds the logger from the level argument and the optional options file.
/// 2. Installs the console relay and routes `tracing` events through it.
/// 3. Prints a start banner.
/// 4. Resolves operator credentials, if any were supplied.
/// 5. Creates the network backend and registers the tools.
///
/// # Arguments
///
/// * `args` - The command-line arguments.
///
/// # Errors
///
/// This function will return an error if the level or options file is
/// invalid, the credentials file cannot be read, or a global subscriber is
/// already installed.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let level: LogLevel = args
        .log_level
        .parse()
        .with_context(|| format!("invalid --log-level '{}'", args.log_level))?;
    let options = match &args.log_config {
        Some(path) => Some(
            LoggerOptions::from_file(path)
                .with_context(|| format!("failed to read logger options from {}", path))?,
        ),
        None => None,
    };

    let buffer = Arc::new(LogBuffer::new(LOG_BUFFER_SIZE));
    let sink: Arc<dyn LogSink> = Arc::new(TeeSink::new(Arc::new(StdioSink), buffer.clone()));
    let classifier = Classifier::builtin(args.verbose_debug)
        .context("failed to build log classification rules")?;
    let logger = Arc::new(Logger::new(
        LoggerConfig {
            level,
            ..LoggerConfig::default()
        },
        classifier,
        formatter(args.no_color),
        sink,
    ));
    if let Some(options) = options {
        logger.configure(options);
    }

    let relay = Arc::new(ConsoleRelay::new(logger.clone()));
    relay.install();
    // The relay applies the live level; RUST_LOG can only narrow it further.
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| "trace".to_string());
    RelayLayer::init_subscriber(relay.clone(), &directives)
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    print_start_banner(&args);

    let operator = resolve_operator(&args)?;
    if let Some(operator) = &operator {
        logger.info(
            &format!("Using operator account {}", operator.account_id),
            Some("Setup"),
        );
    }

    let network: Arc<dyn AgentNetwork> = Arc::new(InMemoryNetwork::with_residents(
        args.network.to_string(),
        operator,
    ));

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(WeatherTool::new()));
    tools.register(Box::new(InitiateConnectionTool::new(
        network.clone(),
        logger.clone(),
    )));

    let context = CommandContext::new(
        logger,
        relay,
        buffer,
        network,
        Arc::new(tools),
        args.data_dir.clone(),
    );

    Ok(PreparedApp { args, context })
}

/// Plain text when colour is disabled or stdout is not a terminal.
fn formatter(no_color: bool) -> Formatter {
    if no_color || !std::io::stdout().is_terminal() {
        Formatter::plain()
    } else {
        Formatter::new(Box::new(AnsiPalette))
    }
}

/// Prints a banner with startup information.
fn print_start_banner(args: &AppArgs) {
    println!("🚀 Starting HCS agent console");
    println!("Network: {}", args.network);
    println!("Log level: {}", args.log_level.to_ascii_uppercase());
    println!("Data directory: {}", args.data_dir);
    println!();
}

/// Resolves the operator identity.
///
/// A credentials file takes precedence over `--account-id`/`--private-key`.
/// Supplying only one of the pair is reported and ignored.
fn resolve_operator(args: &AppArgs) -> Result<Option<AgentCredentials>> {
    if let Some(path) = &args.credentials {
        let creds = load_credentials(path)
            .with_context(|| format!("failed to read credentials from {}", path))?;
        return Ok(Some(creds));
    }

    match (&args.account_id, &args.private_key) {
        (Some(account_id), Some(private_key)) => Ok(Some(AgentCredentials {
            account_id: account_id.clone(),
            private_key: private_key.clone(),
        })),
        (None, None) => Ok(None),
        _ => {
            tracing::warn!(
                "Both HEDERA_ACCOUNT_ID and HEDERA_PRIVATE_KEY are needed; continuing without an operator"
            );
            Ok(None)
        }
    }
}

/// Reads a saved credentials file, falling back to the first credentials
/// block in free-form text such as captured registration output.
fn load_credentials(path: &str) -> Result<AgentCredentials, CredentialsError> {
    match credentials::load(path) {
        Err(CredentialsError::Malformed(_)) => {
            let text = std::fs::read_to_string(path)?;
            credentials::extract_credentials(&text)
        }
        other => other,
    }
}
