//! Langcheck CLI entry point.

use clap::Parser;
use langcheck::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => cli::run_check(&args),
        Commands::Conflicts(args) => cli::run_conflicts(&args),
        Commands::Classify(args) => cli::run_classify(&args),
        Commands::ReleaseGate(args) => cli::run_release_gate(&args),
        Commands::Glyphs(args) => cli::run_glyphs(&args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
