//! Transaction list view of a graph.

use lineage_types::{Address, AssetAction, AssetId, ProvenanceGraph, H256};
use serde::Serialize;
use std::fmt;

/// What a transaction did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Publish,
    Derive,
    Attest,
}

impl From<AssetAction> for TransactionKind {
    fn from(action: AssetAction) -> Self {
        match action {
            AssetAction::Publish => TransactionKind::Publish,
            AssetAction::Derive => TransactionKind::Derive,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Publish => "publish",
            TransactionKind::Derive => "derive",
            TransactionKind::Attest => "attest",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub kind: TransactionKind,
    pub tx_hash: H256,
    pub actor: Address,
    pub asset_id: AssetId,
    pub block_number: u64,
}

/// Every reachable asset and attached attestation as one row, newest block first.
///
/// Rows from the same block keep graph pre-order, each asset ahead of its
/// attestations.
pub fn flatten_transactions(graph: &ProvenanceGraph) -> Vec<TransactionRow> {
    let mut rows = Vec::new();

    for node in graph.iter() {
        let asset = &node.asset;
        rows.push(TransactionRow {
            kind: asset.action.into(),
            tx_hash: asset.tx_hash,
            actor: asset.actor,
            asset_id: asset.asset_id,
            block_number: asset.block_number,
        });
        rows.extend(node.attestations.iter().map(|a| TransactionRow {
            kind: TransactionKind::Attest,
            tx_hash: a.tx_hash,
            actor: a.actor,
            asset_id: a.asset_id,
            block_number: a.block_number,
        }));
    }

    rows.sort_by(|a, b| b.block_number.cmp(&a.block_number));
    rows
}
