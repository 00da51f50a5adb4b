//! Lateflow CLI - late-arrival strike counting and penalty tooling

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{count, init, policy, record, report, reprocess, seed, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args).await,
        cli::Commands::Policy(args) => policy::execute(args, &cli.global).await,
        cli::Commands::Seed(args) => seed::execute(args, &cli.global).await,
        cli::Commands::Record(args) => record::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Count(args) => count::execute(args, &cli.global).await,
        cli::Commands::Reprocess(args) => reprocess::execute(args, &cli.global).await,
        cli::Commands::Report(args) => report::execute(args, &cli.global).await,
    };

    match result {
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::exit(code.0),
            None => Err(err),
        },
        ok => ok,
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
