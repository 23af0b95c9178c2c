use std::process::ExitCode;

use clap::Parser;
use stockdash_web::cli::{Cli, Command};
use stockdash_web::{inspect, serve, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Inspect(args) => inspect::run(&args, &mut std::io::stdout().lock()),
    }
}
