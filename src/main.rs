//! Binary entry point for the steadyref CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Report unstable attribute values in the workspace
//! steadyref check
//!
//! # Report as JSON, for a subset of files
//! steadyref check src/components --format json
//!
//! # Preview the suggestion for one finding, then write it
//! steadyref fix src/List.tsx --at 3:24
//! steadyref fix src/List.tsx --at 3:24 --apply
//!
//! # List rules
//! steadyref rules
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use steadyref::cli::{
    render_check_text, render_rules_text, run_check, run_fix, run_rules, Workspace,
};
use steadyref::error::{OutputErrorCode, SteadyError};
use steadyref::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Find attribute values that are re-created on every render.
///
/// steadyref reports array, object and function values passed as JSX
/// attributes without memoization, and suggests a rewrite for each.
#[derive(Parser, Debug)]
#[command(
    name = "steadyref",
    version,
    about = "Find unstable attribute values in TSX/JSX components"
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
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Configuration file (default: steadyref.toml in the workspace).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
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

/// Output format for check and fix.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines (check) or a unified diff (fix).
    #[default]
    Text,
    /// JSON response envelope.
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze files and report findings.
    ///
    /// Exits with status 1 when anything is reported.
    Check {
        /// Files or directories to analyze (default: the whole workspace).
        paths: Vec<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the suggestion for one finding, optionally writing it.
    Fix {
        /// File containing the finding.
        file: PathBuf,

        /// Position where the finding starts (line:col).
        #[arg(long)]
        at: String,

        /// Rule to select when several findings start at the position.
        #[arg(long)]
        rule: Option<String>,

        /// Write the change to disk.
        #[arg(long)]
        apply: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List rules and whether they are enabled.
    Rules {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, SteadyError> {
    let workspace = open_workspace(&cli.global)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Check { paths, format } => {
            let response = run_check(&workspace, &paths)?;
            match format {
                OutputFormat::Text => render_check_text(&response, &mut stdout)?,
                OutputFormat::Json => emit_response(&response, &mut stdout)?,
            }
            if response.diagnostics.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(OutputErrorCode::FindingsReported.code()))
            }
        }
        Command::Fix {
            file,
            at,
            rule,
            apply,
            format,
        } => {
            let response = run_fix(&workspace, &file, &at, rule.as_deref(), apply)?;
            match format {
                OutputFormat::Text => write!(stdout, "{}", response.patch.unified_diff)?,
                OutputFormat::Json => emit_response(&response, &mut stdout)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Rules { format } => {
            let response = run_rules(&workspace);
            match format {
                OutputFormat::Text => render_rules_text(&response, &mut stdout)?,
                OutputFormat::Json => emit_response(&response, &mut stdout)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_workspace(global: &GlobalArgs) -> Result<Workspace, SteadyError> {
    let root = match &global.workspace {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    Workspace::open(&root, global.config.as_deref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn check_defaults() {
            let cli = Cli::try_parse_from(["steadyref", "check"]).unwrap();
            match cli.command {
                Command::Check { paths, format } => {
                    assert!(paths.is_empty());
                    assert!(matches!(format, OutputFormat::Text));
                }
                _ => panic!("expected Check"),
            }
            assert!(matches!(cli.global.log_level, LogLevel::Warn));
            assert!(!cli.global.log_json);
        }

        #[test]
        fn check_paths_and_json() {
            let cli = Cli::try_parse_from([
                "steadyref",
                "check",
                "src/a.tsx",
                "src/components",
                "--format",
                "json",
            ])
            .unwrap();
            match cli.command {
                Command::Check { paths, format } => {
                    assert_eq!(
                        paths,
                        vec![PathBuf::from("src/a.tsx"), PathBuf::from("src/components")]
                    );
                    assert!(matches!(format, OutputFormat::Json));
                }
                _ => panic!("expected Check"),
            }
        }

        #[test]
        fn fix_arguments() {
            let cli = Cli::try_parse_from([
                "steadyref",
                "fix",
                "src/List.tsx",
                "--at",
                "3:24",
                "--rule",
                "memoize-jsx-attributes",
                "--apply",
            ])
            .unwrap();
            match cli.command {
                Command::Fix {
                    file,
                    at,
                    rule,
                    apply,
                    format,
                } => {
                    assert_eq!(file, PathBuf::from("src/List.tsx"));
                    assert_eq!(at, "3:24");
                    assert_eq!(rule.as_deref(), Some("memoize-jsx-attributes"));
                    assert!(apply);
                    assert!(matches!(format, OutputFormat::Text));
                }
                _ => panic!("expected Fix"),
            }
        }

        #[test]
        fn fix_requires_at() {
            assert!(Cli::try_parse_from(["steadyref", "fix", "src/List.tsx"]).is_err());
        }

        #[test]
        fn global_args_after_subcommand() {
            let cli = Cli::try_parse_from([
                "steadyref",
                "rules",
                "--workspace",
                "/tmp/ws",
                "--config",
                "ci.toml",
                "--log-level",
                "debug",
                "--log-json",
            ])
            .unwrap();
            assert_eq!(cli.global.workspace, Some(PathBuf::from("/tmp/ws")));
            assert_eq!(cli.global.config, Some(PathBuf::from("ci.toml")));
            assert!(matches!(cli.global.log_level, LogLevel::Debug));
            assert!(cli.global.log_json);
            assert!(matches!(cli.command, Command::Rules { .. }));
        }

        #[test]
        fn unknown_log_level_is_rejected() {
            assert!(Cli::try_parse_from(["steadyref", "rules", "--log-level", "loud"]).is_err());
        }
    }
}
