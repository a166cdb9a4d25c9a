pub mod cli;
pub mod columns;
pub mod error;
pub mod extract;
pub mod import;
pub mod io_utils;
pub mod mans;
pub mod prompt;
pub mod schema_cmd;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_sqlite", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Import(args) => import::execute(&args),
        Commands::Schema(args) => schema_cmd::execute(&args),
        Commands::Mans(args) => mans::execute(&args),
    }
}
