//! Core data model for on-chain provenance reconstruction.
//!
//! This crate defines the decoded event records emitted by the provenance
//! registry contract and the materialized graph built from them:
//!
//! - [`AssetEvent`] / [`AttestationEvent`]: one decoded log record each
//! - [`ProvenanceNode`]: an asset plus its derivatives and attestations
//! - [`ProvenanceGraph`]: the root set plus aggregate statistics
//!
//! # Example
//!
//! ```
//! use lineage_types::{AssetAction, EventKind};
//!
//! assert_eq!(AssetAction::from(0u8), AssetAction::Publish);
//! assert_eq!(AssetAction::from(7u8), AssetAction::Derive);
//! assert_eq!(
//!     EventKind::AssetAttested.signature(),
//!     "AssetAttested(uint256,address,bytes32,string)"
//! );
//! ```

mod event;
mod node;

pub use ethers::types::{Address, H256, U256};
pub use event::{AssetAction, AssetEvent, AttestationEvent, EventKind};
pub use node::{GraphDiagnostics, GraphMetrics, Nodes, ProvenanceGraph, ProvenanceNode};

/// Identifier assigned to an asset by the registry contract.
pub type AssetId = U256;
