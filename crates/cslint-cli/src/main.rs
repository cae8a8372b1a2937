//! cslint CLI
//!
//! Command-line interface for the cslint C# style analyzer.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "cslint")]
#[command(about = "cslint: brace-style analyzer and fixer for C# source")]
#[command(version = cslint_core::VERSION)]
#[command(
    long_about = "cslint analyzes C# source files for omitted statement braces and can\n\
apply trivia-preserving fixes.\n\
\n\
Examples:\n  \
cslint check src/            # Analyze files under src/\n  \
cslint check --format json . # Machine-readable findings\n  \
cslint fix --dry-run src/    # Preview fixes as diffs\n  \
cslint rules                 # List the rule registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (cslint.toml or .cslintrc.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads for parallel analysis (default: CPU cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze files and report diagnostics
    Check {
        /// Files or directories to analyze (default: current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Apply fixes for fixable diagnostics
    Fix {
        /// Files or directories to fix (default: current directory)
        paths: Vec<PathBuf>,

        /// Preview changes as diffs without writing files
        #[arg(long)]
        dry_run: bool,
    },
    /// List the rule registry
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("failed to configure thread pool: {e}");
    }

    let outcome = match &cli.command {
        Commands::Check { paths, format } => commands::check(
            paths,
            *format == Format::Json,
            cli.config.as_deref(),
            cli.no_color,
        ),
        Commands::Fix { paths, dry_run } => {
            commands::fix(paths, *dry_run, cli.config.as_deref())
        }
        Commands::Rules => commands::rules(cli.config.as_deref()),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = match verbosity {
        0 => "cslint=warn",
        1 => "cslint=info",
        2 => "cslint=debug",
        _ => "cslint=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
