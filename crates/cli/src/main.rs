// SPDX-License-Identifier: MIT

mod cli;
mod commands;
mod context;
mod exit_error;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use exit_error::ExitError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Workflows(args) => commands::workflows::run(args, &cli.global).await,
        Command::Processors(args) => commands::processors::run(args, &cli.global).await,
        Command::Worker(args) => commands::worker::run(args, &cli.global).await,
    };

    if let Err(err) = result {
        report_and_exit(err);
    }
}

fn report_and_exit(err: ExitError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(err.code);
}
