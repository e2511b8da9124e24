//! Binary entry point for the tug-selectors CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Migrate app/**/*.hbs and addon/**/*.hbs in the current directory
//! tug-selectors migrate
//!
//! # Preview changes to a subset of templates as unified diffs
//! tug-selectors migrate 'app/components/**/*.hbs' --dry-run
//!
//! # Fail CI while positional selectors remain
//! tug-selectors check
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tug_core::error::OutputErrorCode;
use tug_core::output::{emit_response, CheckResponse, ErrorResponse, MigrateResponse};
use tug_selectors::{
    run_check, run_migration, BarProgress, CheckReport, MigrateConfig, MigrateError,
    MigrationReport, NoProgress,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Promote positional data-test selectors in Handlebars templates.
#[derive(Parser, Debug)]
#[command(
    name = "tug-selectors",
    version,
    about = "Promote positional data-test selectors to keyword arguments"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
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

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary with a progress bar (default).
    #[default]
    Text,
    /// JSON response on stdout, no progress output.
    Json,
}

/// Arguments selecting which templates to process.
#[derive(Parser, Debug)]
struct TargetArgs {
    /// Glob patterns relative to --cwd; prefix with `!` to exclude.
    /// Defaults to `app/**/*.hbs` and `addon/**/*.hbs`.
    patterns: Vec<String>,

    /// Directory to search (default: current directory).
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Regular expression a positional argument must match to be a selector.
    #[arg(long, default_value = tug_selectors::selector::DEFAULT_SELECTOR_PATTERN)]
    selector_pattern: String,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite positional selectors as `selector=true` keyword arguments.
    Migrate {
        #[command(flatten)]
        target: TargetArgs,
        /// Regenerate every changed tag instead of patching lone selectors in the printed text.
        #[arg(long)]
        no_fast_path: bool,
        /// Report changes as unified diffs without writing files.
        #[arg(long)]
        dry_run: bool,
    },
    /// List positional selectors without changing anything.
    ///
    /// Exits with status 1 when any are found.
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::new(error_code, err.to_string());

            // Errors go to stdout as JSON, same as results
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, MigrateError> {
    match cli.command {
        Command::Migrate {
            target,
            no_fast_path,
            dry_run,
        } => {
            let config = build_config(&target)?
                .with_fast_path(!no_fast_path)
                .with_dry_run(dry_run);
            execute_migrate(&config, target.format)
        }
        Command::Check { target } => {
            let config = build_config(&target)?;
            execute_check(&config, target.format)
        }
    }
}

fn build_config(target: &TargetArgs) -> Result<MigrateConfig, MigrateError> {
    let cwd = match &target.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    MigrateConfig::new(cwd)
        .with_patterns(target.patterns.clone())
        .with_selector_pattern(&target.selector_pattern)
}

fn execute_migrate(config: &MigrateConfig, format: OutputFormat) -> Result<ExitCode, MigrateError> {
    // Progress goes to stderr for text output only
    let report = match format {
        OutputFormat::Text => run_migration(config, &mut BarProgress::stderr())?,
        OutputFormat::Json => run_migration(config, &mut NoProgress)?,
    };

    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => {
            let response = MigrateResponse::new(
                config.dry_run,
                report.files_scanned,
                report.changed.clone(),
                report.failures.iter().map(|f| f.to_info()).collect(),
            );
            emit_response(&response, &mut stdout)?;
        }
        OutputFormat::Text => write_migrate_summary(&report, config.dry_run, &mut stdout)?,
    }
    stdout.flush()?;

    if report.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(OutputErrorCode::ApplyError.code()))
    }
}

fn write_migrate_summary(
    report: &MigrationReport,
    dry_run: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    for diff in &report.diffs {
        write!(out, "{}", diff)?;
    }
    let verb = if dry_run { "Would migrate" } else { "Migrated" };
    writeln!(
        out,
        "{} {} of {} templates",
        verb,
        report.changed.len(),
        report.files_scanned
    )?;
    if !report.failures.is_empty() {
        writeln!(out, "{} templates failed:", report.failures.len())?;
        for failure in &report.failures {
            writeln!(out, "  {}", failure)?;
        }
    }
    Ok(())
}

fn execute_check(config: &MigrateConfig, format: OutputFormat) -> Result<ExitCode, MigrateError> {
    let report = match format {
        OutputFormat::Text => run_check(config, &mut BarProgress::stderr())?,
        OutputFormat::Json => run_check(config, &mut NoProgress)?,
    };

    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => {
            let response = CheckResponse::new(
                report.files_scanned,
                report.selectors.iter().map(|s| s.to_info()).collect(),
                report.failures.iter().map(|f| f.to_info()).collect(),
            );
            emit_response(&response, &mut stdout)?;
        }
        OutputFormat::Text => write_check_summary(&report, &mut stdout)?,
    }
    stdout.flush()?;

    Ok(check_exit_code(&report))
}

fn write_check_summary(report: &CheckReport, out: &mut impl Write) -> io::Result<()> {
    for selector in &report.selectors {
        writeln!(out, "{}", selector)?;
    }
    for failure in &report.failures {
        writeln!(out, "{}", failure)?;
    }
    writeln!(
        out,
        "{} positional selectors in {} templates",
        report.selectors.len(),
        report.files_scanned
    )
}

fn check_exit_code(report: &CheckReport) -> ExitCode {
    if !report.selectors.is_empty() {
        ExitCode::from(OutputErrorCode::SelectorsFound.code())
    } else if !report.failures.is_empty() {
        ExitCode::from(OutputErrorCode::ApplyError.code())
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Tests
// ============================================================================
