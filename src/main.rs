//! Binary entry point for the riptide CLI.
//!
//! Prints the legacy Ripper sexp for a Ruby source file.
//!
//! ## Usage
//!
//! ```bash
//! # Flattened output, like Ripper.sexp
//! riptide app.rb
//!
//! # Unflattened output, like Ripper.sexp_raw
//! echo 'foo bar' | riptide --raw
//!
//! # JSON, with symbols as ":name" strings
//! riptide --format json app.rb
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};

use riptide::{
    AccumulatingSink, Adapter, AdapterError, AdapterOptions, Engine, EventSink, ExitStatus,
    RawSink, Value,
};
use riptide_syntax::prettify_error;

// ============================================================================
// CLI Structure
// ============================================================================

/// Print the legacy Ripper sexp for Ruby source.
#[derive(Parser, Debug)]
#[command(name = "riptide", version, about = "Print the legacy Ripper sexp for Ruby source")]
struct Cli {
    /// Source file to read (default: stdin).
    file: Option<PathBuf>,

    /// Print the unflattened `sexp_raw` shape.
    #[arg(long)]
    raw: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "sexp")]
    format: OutputFormat,

    /// Legacy runtime whose output is reproduced.
    #[arg(long, value_enum, default_value = "cruby")]
    engine: EngineArg,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Ruby `inspect` notation (default).
    #[default]
    Sexp,
    /// JSON; symbols become `":name"` strings.
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    Cruby,
    Jruby,
}

impl From<EngineArg> for Engine {
    fn from(engine: EngineArg) -> Self {
        match engine {
            EngineArg::Cruby => Engine::CRuby,
            EngineArg::Jruby => Engine::JRuby,
        }
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl CliError {
    fn exit_status(&self) -> ExitStatus {
        match self {
            CliError::Read { .. } | CliError::Write(_) | CliError::Json(_) => ExitStatus::Io,
            CliError::Adapter(error) => error.exit_status(),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_level, cli.log_json);

    match execute(&cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("riptide: {err}");
            ExitCode::from(err.exit_status().code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn execute(cli: &Cli) -> Result<ExitStatus, CliError> {
    let (label, text) = read_input(cli.file.as_deref())?;
    let options = AdapterOptions::new().with_engine(cli.engine.into());
    info!(
        input = %label,
        bytes = text.len(),
        engine = %options.engine,
        raw = cli.raw,
        "translating"
    );

    if cli.raw {
        replay(Adapter::with_options(text, RawSink::new(), options), cli.format, &label)
    } else {
        replay(
            Adapter::with_options(text, AccumulatingSink::new(), options),
            cli.format,
            &label,
        )
    }
}

fn read_input(file: Option<&Path>) -> Result<(String, String), CliError> {
    match file {
        Some(path) => {
            let label = path.display().to_string();
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: label.clone(),
                source,
            })?;
            Ok((label, text))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(("-".to_string(), text))
        }
    }
}

/// Runs the adapter and prints either the sexp or the diagnostics.
fn replay<S: EventSink>(
    mut adapter: Adapter<S>,
    format: OutputFormat,
    label: &str,
) -> Result<ExitStatus, CliError> {
    match adapter.parse()? {
        Some(value) => {
            write_value(&value, format)?;
            Ok(ExitStatus::Success)
        }
        None => {
            let result = adapter.result();
            debug!(errors = result.errors.len(), "source has syntax errors");
            let mut stderr = io::stderr().lock();
            for error in &result.errors {
                writeln!(stderr, "{}", prettify_error(error, &result.source, label))?;
            }
            Ok(ExitStatus::SyntaxError)
        }
    }
}

fn write_value(value: &Value, format: OutputFormat) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Sexp => writeln!(stdout, "{value}")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
