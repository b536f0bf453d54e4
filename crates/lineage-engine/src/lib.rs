//! One-call provenance reconstruction.
//!
//! [`Engine`] pins the chain head, scans asset and attestation logs
//! concurrently, decodes them, and hands both sequences to the graph builder.
//! Configuration comes from [`EngineConfig`], usually loaded from a
//! `lineage.toml` through [`LineageConfig`].

mod config;
mod engine;

pub use config::{
    ConfigError, EngineConfig, LineageConfig, ScanSection, SourceSection, DEFAULT_CONTRACT,
    DEFAULT_RPC_URL,
};
pub use engine::{decode_logs, fetch_and_build_graph, Decoded, Engine, EngineError, GraphReport};
