// crates/survey-form-cli/src/main.rs
// ============================================================================
// Module: Survey Form CLI Entry Point
// Description: Command dispatcher for serving and submitting the survey form.
// Purpose: Provide a safe, localized CLI for the form server and form client.
// Dependencies: clap, dialoguer, survey-form-server, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The survey form CLI runs the form server (`serve`), validates its config
//! (`config validate`, `config example`), and acts as the form client
//! (`submit` for JSON files, `fill` for interactive prompts). All user-facing
//! strings are routed through the i18n catalog. Security posture: inputs are
//! untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod form_prompts;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde_json::Value;
use survey_form_cli::form_client::FormClient;
use survey_form_cli::form_client::FormClientConfig;
use survey_form_cli::form_client::FormClientError;
use survey_form_cli::form_client::NotificationVariant;
use survey_form_cli::form_client::SubmissionReply;
use survey_form_cli::form_client::describe_field_errors;
use survey_form_cli::i18n::Locale;
use survey_form_cli::i18n::set_locale;
use survey_form_cli::serve_policy::BindOutcome;
use survey_form_cli::serve_policy::enforce_local_only;
use survey_form_cli::serve_policy::resolve_allow_non_loopback;
use survey_form_cli::t;
use survey_form_config::SurveyFormConfig;
use survey_form_config::config_toml_example;
use survey_form_server::SurveyFormServer;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Constants
// ============================================================================

/// Maximum size of a JSON submission file read by `submit`.
const MAX_SUBMISSION_INPUT_BYTES: usize = 64 * 1024;
/// Default client timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "SURVEY_FORM_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "survey-form", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `SURVEY_FORM_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the survey form server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Validate and submit a JSON survey response.
    Submit(SubmitCommand),
    /// Fill in the survey interactively and submit it.
    Fill(FillCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to survey-form.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Allow binding to non-loopback addresses.
    #[arg(long, action = ArgAction::SetTrue)]
    allow_non_loopback: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example config.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to survey-form.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Shared form client connection settings.
#[derive(Args, Debug)]
struct FormClientArgs {
    /// Server base URL (for example, `http://127.0.0.1:3000`) or full form URL.
    #[arg(long, value_name = "URL")]
    endpoint: String,
    /// Request timeout in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

/// Arguments for `submit`.
#[derive(Args, Debug)]
struct SubmitCommand {
    /// Form client connection settings.
    #[command(flatten)]
    client: FormClientArgs,
    /// Path to the JSON survey response.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
}

/// Arguments for `fill`.
#[derive(Args, Debug)]
struct FillCommand {
    /// Form client connection settings.
    #[command(flatten)]
    client: FormClientArgs,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Spanish.
    Es,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Es => Self::Es,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
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

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Submit(command) => command_submit(command).await,
        Commands::Fill(command) => command_fill(command).await,
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = SurveyFormConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let allow_non_loopback = resolve_allow_non_loopback(command.allow_non_loopback)
        .map_err(|err| CliError::new(err.to_string()))?;
    let bind_outcome = enforce_local_only(&config, allow_non_loopback)
        .map_err(|err| CliError::new(err.to_string()))?;
    if bind_outcome.network_exposed {
        warn_network_exposure(&bind_outcome)?;
    }

    let server = tokio::task::spawn_blocking(move || SurveyFormServer::from_config(config))
        .await
        .map_err(|err| {
            CliError::new(t!("serve.init_failed", error = format!("init join failed: {err}")))
        })?
        .map_err(|err| CliError::new(t!("serve.init_failed", error = err)))?;
    write_stderr_line(&t!("serve.listening", bind = server.bind_addr()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(t!("serve.failed", error = err)))?;

    Ok(ExitCode::SUCCESS)
}

/// Prints the network exposure warning block.
fn warn_network_exposure(outcome: &BindOutcome) -> CliResult<()> {
    let enabled = t!("serve.warn.network.enabled");
    let disabled = t!("serve.warn.network.disabled");
    let forwarded_status =
        if outcome.trust_forwarded_for { enabled.clone() } else { disabled.clone() };
    let audit_status = if outcome.audit_enabled { enabled } else { disabled };
    write_stderr_line(&t!("serve.warn.network.header"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    write_stderr_line(&t!("serve.warn.network.bind", bind = outcome.bind_addr))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    write_stderr_line(&t!("serve.warn.network.forwarded", status = forwarded_status))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    write_stderr_line(&t!("serve.warn.network.audit", status = audit_status))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = SurveyFormConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Form Client Commands
// ============================================================================

/// Executes the `submit` command.
async fn command_submit(command: SubmitCommand) -> CliResult<ExitCode> {
    let payload = read_submission_input(&command.input)?;
    let client = build_form_client(&command.client)?;
    let result = client.submit(&payload).await;
    report_submission(result)
}

/// Executes the `fill` command.
async fn command_fill(command: FillCommand) -> CliResult<ExitCode> {
    let client = build_form_client(&command.client)?;
    write_stdout_line(&t!("form.title"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    let response = tokio::task::spawn_blocking(form_prompts::prompt_response)
        .await
        .map_err(|err| CliError::new(t!("fill.prompt_failed", error = err)))?
        .map_err(CliError::new)?;
    let result = client.submit_response(&response).await;
    report_submission(result)
}

/// Builds a form client from CLI arguments.
fn build_form_client(args: &FormClientArgs) -> CliResult<FormClient> {
    let config = FormClientConfig {
        endpoint: args.endpoint.clone(),
        timeout: Duration::from_millis(args.timeout_ms),
    };
    FormClient::new(config).map_err(|err| match err {
        FormClientError::Config(error) => CliError::new(t!(
            "client.endpoint_invalid",
            endpoint = args.endpoint,
            error = error
        )),
        other => CliError::new(t!("client.init_failed", error = other)),
    })
}

/// Prints the notification for a submission attempt and picks the exit code.
fn report_submission(result: Result<SubmissionReply, FormClientError>) -> CliResult<ExitCode> {
    let notification = match result {
        Ok(reply) => reply.outcome.notification(),
        Err(FormClientError::Invalid(errors)) => {
            write_stderr_line(&t!("submit.invalid.header"))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            for line in describe_field_errors(&errors) {
                write_stderr_line(&line)
                    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => err.notification(),
    };
    let line = notification.render();
    if notification.variant == NotificationVariant::Destructive {
        write_stderr_line(&line).map_err(|err| CliError::new(output_error("stderr", &err)))?;
        return Ok(ExitCode::FAILURE);
    }
    write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Reads and parses the JSON submission input file.
fn read_submission_input(path: &Path) -> CliResult<Value> {
    let kind = t!("input.kind.submission");
    let bytes =
        read_bytes_with_limit(path, MAX_SUBMISSION_INPUT_BYTES).map_err(|err| match err {
            ReadLimitError::Io(err) => CliError::new(t!(
                "input.read_failed",
                kind = kind,
                path = path.display(),
                error = err
            )),
            ReadLimitError::TooLarge {
                size,
                limit,
            } => CliError::new(t!(
                "input.read_too_large",
                kind = kind,
                path = path.display(),
                size = size,
                limit = limit
            )),
        })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Resolves the output locale from the flag, then the environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
