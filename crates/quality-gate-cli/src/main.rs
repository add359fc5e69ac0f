// crates/quality-gate-cli/src/main.rs
// ============================================================================
// Module: Quality Gate CLI Entry Point
// Description: Command dispatcher for index verification and the profile harness.
// Purpose: Provide a localized CLI with stable exit codes for CI pipelines.
// Dependencies: clap, quality-gate-cli, quality-gate-config, quality-gate-core
// ============================================================================

//! ## Overview
//! `quality-gate verify` checks files against a digest index and exits `0`
//! when clean, `1` on findings, and `2` on fatal errors. `quality-gate
//! harness` runs every test profile, writes the results document, and prints
//! the summary; it exits `1` only when the run itself fails. Reports go to
//! stdout, run events go to the configured event log.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use quality_gate_cli::runner::CommandCaseRunner;
use quality_gate_cli::runner::EchoCaseRunner;
use quality_gate_cli::t;
use quality_gate_config::EnvConfig;
use quality_gate_config::EventLogTarget;
use quality_gate_config::QualityGateConfig;
use quality_gate_config::ReportFormat;
use quality_gate_core::CaseRunner;
use quality_gate_core::DEFAULT_HASH_ALGORITHM;
use quality_gate_core::FileEventSink;
use quality_gate_core::HashError;
use quality_gate_core::Harness;
use quality_gate_core::HarnessRequest;
use quality_gate_core::IndexError;
use quality_gate_core::IndexVerifier;
use quality_gate_core::NoopEventSink;
use quality_gate_core::RunEventSink;
use quality_gate_core::StderrEventSink;
use quality_gate_core::VerificationReport;
use quality_gate_core::VerificationStatus;
use quality_gate_core::VerifyError;
use quality_gate_core::to_pretty_json;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Exit code for a verification run that could not complete.
const VERIFY_FATAL_EXIT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "quality-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to quality-gate.toml or `QUALITY_GATE_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Run event log target: `stderr`, `off`, or a file path.
    #[arg(long, value_name = "TARGET", global = true)]
    event_log: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify files against a SHA-256 digest index.
    Verify(VerifyCommand),
    /// Run test profiles and aggregate their results.
    Harness(HarnessCommand),
}

/// Arguments for index verification.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Root directory the index paths are relative to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
    /// Index file, resolved relative to the root (defaults to `FILE_INDEX_SHA256.txt`).
    #[arg(long, value_name = "PATH")]
    index: Option<PathBuf>,
    /// Output format for the verification report.
    #[arg(long, value_enum)]
    format: Option<VerifyFormat>,
}

/// Output formats for verification reports.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum VerifyFormat {
    /// Count line followed by the missing and mismatch sections.
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Arguments for the profile harness.
#[derive(Args, Debug)]
struct HarnessCommand {
    /// Repository root handed to the case runner.
    #[arg(long, value_name = "DIR", default_value = ".")]
    repo_root: PathBuf,
    /// Profile directory, resolved relative to the repository root.
    #[arg(long, value_name = "DIR")]
    profiles: Option<PathBuf>,
    /// Ask the case runner to refresh its expected outputs.
    #[arg(long, action = ArgAction::SetTrue)]
    update_expected: bool,
    /// Results document path, resolved relative to the repository root.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// External case runner program (overrides `harness.runner`).
    #[arg(long, value_name = "PROGRAM")]
    runner: Option<String>,
    /// Argument for the external case runner; repeat for several.
    #[arg(
        long = "runner-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        requires = "runner"
    )]
    runner_args: Vec<String>,
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
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

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

    let globals = GlobalOptions {
        config: cli.config,
        event_log: cli.event_log,
    };
    match command {
        Commands::Verify(command) => Ok(command_verify(&globals, &command)),
        Commands::Harness(command) => command_harness(&globals, command),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(&help).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Shared Setup
// ============================================================================

/// Options shared by every subcommand.
struct GlobalOptions {
    /// Explicit config file path.
    config: Option<PathBuf>,
    /// Explicit event log target.
    event_log: Option<String>,
}

/// Settings resolved from flags, environment, and the config file.
struct Settings {
    /// Parsed configuration file, or defaults.
    config: QualityGateConfig,
    /// Selected run event sink.
    events: Box<dyn RunEventSink>,
}

/// Loads configuration and opens the event sink.
///
/// Precedence is CLI flag, then environment, then config file.
fn load_settings(globals: &GlobalOptions) -> CliResult<Settings> {
    let env = EnvConfig::load().map_err(|err| CliError::new(t!("env.load_failed", error = err)))?;
    let config_path = globals.config.clone().or(env.config_path);
    let config = QualityGateConfig::load(config_path.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;

    let target = match (&globals.event_log, env.event_log, &config.events.log) {
        (Some(flag), _, _) => parse_event_target(flag)?,
        (None, Some(target), _) => target,
        (None, None, Some(configured)) => parse_event_target(configured)?,
        (None, None, None) => EventLogTarget::Off,
    };
    let events = open_event_sink(&target)?;
    Ok(Settings {
        config,
        events,
    })
}

/// Parses an event log target from a flag or config value.
fn parse_event_target(raw: &str) -> CliResult<EventLogTarget> {
    EventLogTarget::parse(raw)
        .map_err(|err| CliError::new(t!("events.target_invalid", error = err)))
}

/// Opens the sink for an event log target.
fn open_event_sink(target: &EventLogTarget) -> CliResult<Box<dyn RunEventSink>> {
    match target {
        EventLogTarget::Off => Ok(Box::new(NoopEventSink)),
        EventLogTarget::Stderr => Ok(Box::new(StderrEventSink)),
        EventLogTarget::File(path) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("events.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
    }
}

// ============================================================================
// SECTION: Verify Command
// ============================================================================

/// Runs index verification and maps every fatal error to exit code 2.
fn command_verify(globals: &GlobalOptions, command: &VerifyCommand) -> ExitCode {
    match run_verify(globals, command) {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&err.to_string());
            ExitCode::from(VERIFY_FATAL_EXIT)
        }
    }
}

/// Verifies the index and writes the report.
fn run_verify(globals: &GlobalOptions, command: &VerifyCommand) -> CliResult<ExitCode> {
    let settings = load_settings(globals)?;
    let root = resolve_root(&command.root)?;
    let index = command
        .index
        .clone()
        .unwrap_or_else(|| PathBuf::from(settings.config.verify.index_or_default()));
    let format = command
        .format
        .map(ReportFormat::from)
        .or(settings.config.verify.format)
        .unwrap_or_default();

    let verifier = IndexVerifier::new(DEFAULT_HASH_ALGORITHM, settings.events.as_ref());
    let report = match verifier.verify(&root, &index) {
        Ok(report) => report,
        Err(err) => {
            write_stdout_line(&verify_diagnostic(&err))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            return Ok(ExitCode::from(VERIFY_FATAL_EXIT));
        }
    };

    let output = render_verification_report(format, &report)?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;

    let exit_code = match report.status() {
        VerificationStatus::Pass => ExitCode::SUCCESS,
        VerificationStatus::Fail => ExitCode::FAILURE,
    };
    Ok(exit_code)
}

/// Formats the diagnostic line for a fatal verification error.
fn verify_diagnostic(error: &VerifyError) -> String {
    match error {
        VerifyError::IndexMissing {
            path,
        } => t!("verify.index_missing", path = path.display()),
        VerifyError::IndexUnreadable {
            path,
            source,
        } => t!("verify.index_unreadable", path = path.display(), error = source),
        VerifyError::IndexLineInvalid(IndexError::LineInvalid {
            line, ..
        }) => t!("verify.index_line_invalid", line = line),
        VerifyError::TargetUnreadable(HashError::Read {
            path,
            source,
        }) => t!("verify.target_unreadable", path = path.display(), error = source),
    }
}

/// Renders the verification report in the selected format.
fn render_verification_report(
    format: ReportFormat,
    report: &VerificationReport,
) -> CliResult<String> {
    match format {
        ReportFormat::Text => Ok(report.render_text()),
        ReportFormat::Json => {
            let rendered = serde_json::to_string_pretty(report)
                .map_err(|err| CliError::new(t!("verify.render_failed", error = err)))?;
            Ok(rendered)
        }
    }
}

impl From<VerifyFormat> for ReportFormat {
    fn from(format: VerifyFormat) -> Self {
        match format {
            VerifyFormat::Text => Self::Text,
            VerifyFormat::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Harness Command
// ============================================================================

/// Runs the profile harness and prints the summary.
fn command_harness(globals: &GlobalOptions, command: HarnessCommand) -> CliResult<ExitCode> {
    let settings = load_settings(globals)?;
    let harness_config = &settings.config.harness;
    let profiles = command
        .profiles
        .unwrap_or_else(|| PathBuf::from(harness_config.profiles_or_default()));
    let out = command.out.unwrap_or_else(|| PathBuf::from(harness_config.out_or_default()));
    let repo_root = resolve_root(&command.repo_root)?;
    let request = HarnessRequest {
        profiles_dir: repo_root.join(profiles),
        out_path: repo_root.join(out),
        repo_root,
        update_expected: command.update_expected,
    };

    let runner =
        select_runner(command.runner, command.runner_args, harness_config.runner.as_deref());
    let harness = Harness::new(runner.as_ref(), settings.events.as_ref());
    let outcome = harness
        .run(&request)
        .map_err(|err| CliError::new(t!("harness.failed", error = err)))?;

    let summary = to_pretty_json(&outcome.summary)
        .map_err(|err| CliError::new(t!("harness.summary_failed", error = err)))?;
    write_stdout_bytes(summary.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Chooses the case runner: CLI flags, then config, then the echo runner.
fn select_runner(
    program: Option<String>,
    args: Vec<String>,
    configured: Option<&[String]>,
) -> Box<dyn CaseRunner> {
    if let Some(program) = program {
        return Box::new(CommandCaseRunner::new(program, args));
    }
    match configured.and_then(CommandCaseRunner::from_command_line) {
        Some(runner) => Box::new(runner),
        None => Box::new(EchoCaseRunner),
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Resolves a root directory argument to an absolute path.
///
/// Existing roots are canonicalized; a root that does not exist is made
/// absolute against the working directory so later diagnostics still name
/// a full path.
fn resolve_root(root: &Path) -> CliResult<PathBuf> {
    match fs::canonicalize(root) {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => std::path::absolute(root)
            .map_err(|err| {
                CliError::new(t!("root.resolve_failed", path = root.display(), error = err))
            }),
        Err(err) => {
            Err(CliError::new(t!("root.resolve_failed", path = root.display(), error = err)))
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
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
