//! Config file plus command-line overrides.

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use lineage_engine::{EngineConfig, LineageConfig};
use lineage_types::Address;

/// Flags shared by every command that talks to a chain.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Path to a `lineage.toml` config file
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// JSON-RPC endpoint to read logs from
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Registry contract address
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// First block to scan
    #[arg(long, global = true)]
    pub from_block: Option<u64>,

    /// Last block to scan (defaults to the chain head)
    #[arg(long, global = true)]
    pub to_block: Option<u64>,

    /// Maximum number of blocks per log query
    #[arg(long, global = true)]
    pub chunk_width: Option<u64>,
}

/// Resolved source endpoint and engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rpc_url: String,
    pub engine: EngineConfig,
}

impl SourceArgs {
    /// Load the config file, if any, and apply flag overrides on top.
    pub fn resolve(&self) -> Result<Settings> {
        let mut file = match &self.config {
            Some(path) => LineageConfig::load(path)
                .with_context(|| format!("failed to load config from {path}"))?,
            None => LineageConfig::default(),
        };

        if let Some(url) = &self.rpc_url {
            file.source.rpc_url = url.clone();
        }
        if let Some(contract) = &self.contract {
            file.source.contract_address = parse_address(contract)?;
        }
        if let Some(from) = self.from_block {
            file.scan.start_block = from;
        }
        if let Some(to) = self.to_block {
            file.scan.to_block = Some(to);
        }
        if let Some(width) = self.chunk_width {
            file.scan.chunk_width = width;
        }

        let engine = file.engine_config().context("invalid scan settings")?;
        Ok(Settings {
            rpc_url: file.source.rpc_url,
            engine,
        })
    }
}

fn parse_address(value: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|e| anyhow!("invalid contract address {value}: {e}"))
}
