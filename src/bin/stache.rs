//! Stache CLI Client
//!
//! Command-line interface for a running `stached` daemon.

use std::process::ExitCode;

use clap::Parser;

use stache::client::cli::{run, Args, Outcome};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let outcome = run(args).await;
    match &outcome {
        Outcome::Printed(output) => println!("{output}"),
        Outcome::Failed(message) => eprintln!("{message}"),
    }

    ExitCode::from(outcome.exit_code())
}
