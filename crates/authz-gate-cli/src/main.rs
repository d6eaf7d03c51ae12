// crates/authz-gate-cli/src/main.rs
// ============================================================================
// Module: Authz Gate CLI Entry Point
// Description: Command dispatcher for serving, checking, and config validation.
// Purpose: Provide the `authz-gate` operator binary.
// Dependencies: clap, authz-gate-*, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! `authz-gate serve` runs the gate in front of one upstream,
//! `authz-gate check` performs a single decision query, and
//! `authz-gate config validate` loads and validates the config.
//!
//! Exit codes: `0` success (or allow), `2` deny from `check`, `1` error.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use authz_gate_cli::check::CheckRequest;
use authz_gate_cli::check::run_check;
use authz_gate_cli::logging::LogFormat;
use authz_gate_cli::logging::init_logging;
use authz_gate_cli::server::decision_client_config;
use authz_gate_cli::server::serve;
use authz_gate_client::HttpDecisionClient;
use authz_gate_config::GateConfig;
use authz_gate_core::Verdict;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code reported by `check` when policy denies.
const DENY_EXIT_CODE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "authz-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Emit logs as JSON objects instead of text lines.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_json: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the gate in front of the configured upstream.
    Serve(ServeCommand),
    /// Evaluate one synthetic request against the decision service.
    Check(CheckCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Config file path (defaults to authz-gate.toml or `AUTHZ_GATE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override `server.bind`.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
    /// Override `server.upstream`.
    #[arg(long, value_name = "URL")]
    upstream: Option<String>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Config file path (defaults to authz-gate.toml or `AUTHZ_GATE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override `decision.url`.
    #[arg(long, value_name = "URL")]
    decision_url: Option<String>,
    /// HTTP method of the synthetic request.
    #[arg(long, default_value = "GET")]
    method: String,
    /// Path and optional query of the synthetic request.
    #[arg(long, default_value = "/")]
    path: String,
    /// Host header value.
    #[arg(long)]
    host: Option<String>,
    /// Authorization header value.
    #[arg(long)]
    authorization: Option<String>,
    /// Content-Type header value.
    #[arg(long)]
    content_type: Option<String>,
    /// Request body.
    #[arg(long, default_value = "")]
    body: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an Authz Gate configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to authz-gate.toml or `AUTHZ_GATE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a printable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self { message }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, installs logging, and dispatches.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Text };
    init_logging(format).map_err(|err| CliError::new(err.to_string()))?;
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Check(command) => command_check(command).await,
        Commands::Config { command: ConfigCommand::Validate(command) } => {
            command_config_validate(&command)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `serve`.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
    }
    if let Some(upstream) = command.upstream {
        config.server.upstream = Some(upstream);
    }
    revalidate(&config)?;
    serve(&config).await.map_err(|err| CliError::new(format!("serve failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `check`.
async fn command_check(command: CheckCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(url) = command.decision_url {
        config.decision.url = url;
    }
    revalidate(&config)?;
    let client = HttpDecisionClient::new(&decision_client_config(&config.decision))
        .map_err(|err| CliError::new(format!("check failed: {err}")))?;
    let request = CheckRequest {
        method: command.method,
        target: command.path,
        host: command.host,
        authorization: command.authorization,
        content_type: command.content_type,
        body: command.body,
    };
    let (report, verdict) = run_check(&client, &request)
        .await
        .map_err(|err| CliError::new(format!("check failed: {err}")))?;
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| CliError::new(format!("check output failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(check_exit_code(verdict))
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let summary = format!(
        "config ok: decision.url={} upstream={}",
        config.decision.url,
        config.server.upstream.as_deref().unwrap_or("<none>")
    );
    write_stdout_line(&summary).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads the config with the standard discovery order.
fn load_config(path: Option<&std::path::Path>) -> CliResult<GateConfig> {
    GateConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Validates a config after command-line overrides.
fn revalidate(config: &GateConfig) -> CliResult<()> {
    config.validate().map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Maps a verdict to the `check` exit code.
fn check_exit_code(verdict: Verdict) -> ExitCode {
    match verdict {
        Verdict::Allow => ExitCode::SUCCESS,
        Verdict::Deny => ExitCode::from(DENY_EXIT_CODE),
    }
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
