mod bootstrap_helpers;
mod cli_args;
mod startup;

use anyhow::Result;
use clap::Parser;

use crate::bootstrap_helpers::{init_tracing, load_dotenv};
use crate::cli_args::Cli;
use crate::startup::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_outcome = load_dotenv();
    init_tracing();
    dotenv_outcome.log();
    let cli = Cli::parse();
    run_cli(cli).await
}
