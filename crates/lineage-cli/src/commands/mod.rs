//! Subcommand handlers.

mod build;
mod graph;
mod txs;

pub use build::cmd_build;
pub use graph::cmd_graph;
pub use txs::cmd_txs;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Subcommand};
use lineage_engine::{Engine, GraphReport};
use lineage_fetch::RpcChainClient;
use tracing::info;

use crate::settings::{Settings, SourceArgs};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rebuild the provenance graph and print metrics and the lineage tree
    Graph {
        /// Print the full graph report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registry transactions, newest first
    Txs(TxsArgs),
    /// Build a graph offline from a JSON event dump
    Build {
        /// Path to a `{"assets": [...], "attestations": [...]}` file
        events: Utf8PathBuf,
        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct TxsArgs {
    /// Maximum number of rows to print
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Read events from a JSON dump instead of the chain
    #[arg(long)]
    pub events: Option<Utf8PathBuf>,

    /// Print full explorer links instead of short hashes
    #[arg(long)]
    pub links: bool,

    /// Print rows as JSON
    #[arg(long)]
    pub json: bool,
}

/// Dispatch a parsed command.
pub async fn run(command: Command, source: &SourceArgs) -> Result<()> {
    match command {
        Command::Graph { json } => cmd_graph(source.resolve()?, json).await,
        Command::Txs(args) => cmd_txs(source, args).await,
        Command::Build { events, json } => cmd_build(&events, json),
    }
}

/// Fetch the registry history and build the graph, stopping on Ctrl-C.
async fn rebuild(settings: Settings) -> Result<GraphReport> {
    let Settings { rpc_url, engine } = settings;
    let client = RpcChainClient::new(&rpc_url)
        .with_context(|| format!("invalid RPC endpoint {rpc_url}"))?;
    let engine = Engine::new(client, engine).context("invalid scan settings")?;

    info!(rpc = %rpc_url, contract = ?engine.config().contract_address, "reading registry logs");
    engine
        .fetch_and_build_until(interrupted())
        .await
        .with_context(|| format!("failed to rebuild provenance graph from {rpc_url}"))
}

async fn interrupted() {
    // Without a signal handler the run can only finish on its own.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
