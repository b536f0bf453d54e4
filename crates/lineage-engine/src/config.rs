//! Engine configuration and the `lineage.toml` file format.

use ethers::types::{Address, H160};
use lineage_fetch::FetchConfig;
use serde::Deserialize;
use std::fs;
use std::num::NonZeroU64;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Provenance registry deployment the engine reads by default.
pub const DEFAULT_CONTRACT: Address = H160([
    0x21, 0x47, 0x3c, 0xd6, 0xd8, 0x32, 0xa3, 0xd6, 0xbc, 0x93, 0x3a, 0x2f, 0x59, 0xda, 0xe7,
    0x31, 0x12, 0x76, 0x13, 0x2c,
]);

/// Arc testnet public endpoint.
pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.arc.network";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("chunk_width must be greater than zero")]
    ZeroChunkWidth,

    #[error("max_concurrent_chunks must be greater than zero")]
    ZeroConcurrency,

    #[error("query_timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("to_block {to} is before start_block {from}")]
    InvertedRange { from: u64, to: u64 },
}

/// Everything the engine needs besides a chain client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Registry whose logs are scanned.
    pub contract_address: Address,

    /// First block scanned (the registry's deployment block, or genesis).
    pub start_block: u64,

    /// Last block scanned; `None` pins the head when a scan starts.
    pub to_block: Option<u64>,

    pub fetch: FetchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT,
            start_block: 0,
            to_block: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.max_concurrent_chunks == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.fetch.query_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if let Some(to) = self.to_block {
            if to < self.start_block {
                return Err(ConfigError::InvertedRange {
                    from: self.start_block,
                    to,
                });
            }
        }
        Ok(())
    }
}

/// On-disk configuration. Every key is optional.
///
/// ```toml
/// [source]
/// rpc_url = "https://rpc.testnet.arc.network"
/// contract_address = "0x21473cd6d832a3d6BC933a2f59DAE7311276132C"
///
/// [scan]
/// start_block = 0
/// chunk_width = 9000
/// query_timeout_ms = 30000
/// max_concurrent_chunks = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineageConfig {
    pub source: SourceSection,
    pub scan: ScanSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    pub rpc_url: String,
    pub contract_address: Address,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: DEFAULT_CONTRACT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    pub start_block: u64,
    pub to_block: Option<u64>,
    pub chunk_width: u64,
    pub query_timeout_ms: u64,
    pub max_concurrent_chunks: usize,
}

impl Default for ScanSection {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            start_block: 0,
            to_block: None,
            chunk_width: fetch.chunk_width.get(),
            query_timeout_ms: fetch.query_timeout.as_millis() as u64,
            max_concurrent_chunks: fetch.max_concurrent_chunks,
        }
    }
}

impl LineageConfig {
    /// Load a config file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validated engine settings for this file.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let chunk_width =
            NonZeroU64::new(self.scan.chunk_width).ok_or(ConfigError::ZeroChunkWidth)?;

        let config = EngineConfig {
            contract_address: self.source.contract_address,
            start_block: self.scan.start_block,
            to_block: self.scan.to_block,
            fetch: FetchConfig {
                chunk_width,
                query_timeout: Duration::from_millis(self.scan.query_timeout_ms),
                max_concurrent_chunks: self.scan.max_concurrent_chunks,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
