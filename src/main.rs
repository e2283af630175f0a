//! digrig - Command-line tool for assembling pixel-art rigs into sprite sheets

use clap::Parser;
use std::process::ExitCode;

use digrig::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    cli::run_command(cli.command)
}
