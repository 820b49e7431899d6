//! Digital twin model CLI
//!
//! Provides commands for working with the model catalog of a digital twin
//! instance: listing, dependency-ordered upload, structured download, and
//! dependency-ordered removal.

mod api;
mod cli;
mod model;
mod storage;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(error) = cli::run(args).await {
        eprintln!("Error: {:#}", error);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
