//! Command-line interface for ccm-analyzer.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::output;
use crate::pipeline::Analyzer;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Log filter used when neither `RUST_LOG` nor a verbosity flag is given.
pub const DEFAULT_LOG_FILTER: &str = "warn,ccm_analyzer=info";

/// Multi-language repository analyzer.
///
/// Extracts functions, classes, imports and comments from a source tree and
/// links them into a Canonical Code Model graph of modules, classes,
/// functions and their imports, inheritance and call relationships.
#[derive(Parser)]
#[command(name = "ccm-analyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors and skip the summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository and write the CCM artifacts
    Analyze(AnalyzeArgs),
    /// List recognized languages and their extraction support
    Languages,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Repository root to analyze
    #[arg(short, long, default_value = ".")]
    pub input: PathBuf,

    /// Directory the artifacts are written to
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extract files in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Skip the legacy artifact
    #[arg(long)]
    pub no_legacy: bool,

    /// Analyze test files too
    #[arg(long)]
    pub include_tests: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

impl AnalyzeArgs {
    /// Apply command-line overrides to a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if self.parallel {
            config.parallel = true;
        }
        if self.no_legacy {
            config.legacy_output = false;
        }
        if self.include_tests {
            config.include_test_files = true;
        }
    }
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,ccm_analyzer=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    // A subscriber may already be set when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, quiet: bool) -> anyhow::Result<i32> {
    crate::init();

    let mut config = match Config::load(&args.input, args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    args.apply(&mut config);
    let legacy = config.legacy_output;

    let outcome = match Analyzer::new(&args.input, config)
        .progress(args.progress && !quiet)
        .run()
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let artifacts = output::write_artifacts(&outcome, &args.output_dir, legacy)?;

    if !quiet {
        output::print_summary(&outcome, &artifacts);
    }

    Ok(EXIT_SUCCESS)
}

/// Run the languages command.
pub fn run_languages() -> anyhow::Result<i32> {
    output::print_languages();
    Ok(EXIT_SUCCESS)
}
