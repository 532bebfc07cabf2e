use std::process::ExitCode;

use clap::Parser;
use env_logger::init;
use ezfc_cli::cli::Cli;

fn main() -> ExitCode {
    init();
    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("E: {err:#}");
            ExitCode::FAILURE
        }
    }
}
