//! Decoded registry events.

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::AssetId;

/// How an asset entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetAction {
    /// A new root asset.
    Publish,
    /// An asset derived from an existing one.
    Derive,
}

impl From<u8> for AssetAction {
    /// The contract emits `0` for publish; every other discriminant is a derive.
    fn from(raw: u8) -> Self {
        if raw == 0 {
            AssetAction::Publish
        } else {
            AssetAction::Derive
        }
    }
}

impl fmt::Display for AssetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetAction::Publish => f.write_str("publish"),
            AssetAction::Derive => f.write_str("derive"),
        }
    }
}

/// One `AssetCreated` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEvent {
    /// Identifier assigned by the registry.
    pub asset_id: AssetId,

    /// Claimed parent asset, or zero for a root.
    pub parent_id: AssetId,

    /// Account that emitted the event.
    pub actor: Address,

    pub action: AssetAction,

    /// Content hash of the recipe; opaque to this engine.
    pub recipe_hash: H256,

    /// Location of the recipe; opaque to this engine.
    #[serde(rename = "recipeURI")]
    pub recipe_uri: String,

    /// Transaction that emitted the record.
    pub tx_hash: H256,

    pub block_number: u64,
}

impl AssetEvent {
    /// A node is a root iff its parent id is zero, whatever its action.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_zero()
    }

    pub fn is_derivative(&self) -> bool {
        self.action == AssetAction::Derive
    }
}

/// One `AssetAttested` record. References an asset without changing its lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationEvent {
    pub asset_id: AssetId,
    pub actor: Address,
    pub claim_hash: H256,
    #[serde(rename = "claimURI")]
    pub claim_uri: String,
    pub tx_hash: H256,
    pub block_number: u64,
}

/// The two event kinds emitted by the provenance registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AssetCreated,
    AssetAttested,
}

impl EventKind {
    /// Canonical Solidity signature used to derive the log topic.
    pub fn signature(self) -> &'static str {
        match self {
            EventKind::AssetCreated => {
                "AssetCreated(uint256,uint256,address,uint8,bytes32,string)"
            }
            EventKind::AssetAttested => "AssetAttested(uint256,address,bytes32,string)",
        }
    }

    /// Keccak-256 of [`EventKind::signature`], matched against `topics[0]`.
    pub fn topic(self) -> H256 {
        let digest = Keccak256::digest(self.signature().as_bytes());
        H256::from_slice(digest.as_slice())
    }

    /// Number of indexed parameters carried in `topics[1..]`.
    pub fn indexed_params(self) -> usize {
        match self {
            EventKind::AssetCreated => 3,
            EventKind::AssetAttested => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::AssetCreated => "AssetCreated",
            EventKind::AssetAttested => "AssetAttested",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
