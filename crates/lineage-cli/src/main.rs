use anyhow::Result;
use clap::{ArgAction, Parser};
use lineage_cli::commands::{self, Command};
use lineage_cli::settings::SourceArgs;
use tracing_subscriber::EnvFilter;

/// Rebuild asset provenance graphs from registry contract logs.
#[derive(Parser, Debug)]
#[command(name = "lineage", version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    commands::run(cli.command, &cli.source).await
}
