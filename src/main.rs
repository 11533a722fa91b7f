//! ccm-analyzer CLI entry point.

use clap::Parser;
use ccm_analyzer::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args, cli.quiet),
        Commands::Languages => cli::run_languages(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
