//! `scanplan` command line front end.
//!
//! Plays the role of the view layer: every command loads state through the
//! core services, applies one action and prints the result as JSON.

mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = commands::Cli::parse();
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
