// this_file: crates/quill-cli/src/main.rs

//! Quill CLI: render text as shorthand strokes from the command line.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Render(args) => commands::render::run(&args),
        Commands::Info(args) => commands::info::run(&args),
        Commands::Batch(args) => commands::batch::run(&args),
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
