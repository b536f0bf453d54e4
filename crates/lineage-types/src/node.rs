//! Materialized provenance graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::{AssetEvent, AttestationEvent};
use crate::AssetId;

/// One asset in the graph, with its derivatives and attestations attached.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` walk the subtree without
/// recursing. Serialization nests one level per generation, so very deep
/// chains need a flat encoding instead.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceNode {
    #[serde(flatten)]
    pub asset: AssetEvent,

    /// Derivatives, in the order their assets were indexed.
    #[serde(default)]
    pub children: Vec<ProvenanceNode>,

    /// Attestations targeting this asset, in the order they were indexed.
    #[serde(default)]
    pub attestations: Vec<AttestationEvent>,
}

impl ProvenanceNode {
    pub fn new(asset: AssetEvent) -> Self {
        Self {
            asset,
            children: Vec::new(),
            attestations: Vec::new(),
        }
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset.asset_id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn without_children(&self) -> Self {
        Self {
            asset: self.asset.clone(),
            children: Vec::with_capacity(self.children.len()),
            attestations: self.attestations.clone(),
        }
    }
}

impl Clone for ProvenanceNode {
    fn clone(&self) -> Self {
        // Breadth-first, so every slot comes after its parent's slot.
        let mut sources = vec![self];
        let mut parents = vec![0usize];
        let mut i = 0;
        while i < sources.len() {
            let node = sources[i];
            for child in &node.children {
                sources.push(child);
                parents.push(i);
            }
            i += 1;
        }

        // Attach from the back. A node's children all sit in later slots, so
        // they are complete (pushed in reverse) by the time it is popped.
        let mut built: Vec<ProvenanceNode> =
            sources.iter().map(|node| node.without_children()).collect();
        while built.len() > 1 {
            let slot = built.len() - 1;
            if let Some(mut node) = built.pop() {
                node.children.reverse();
                built[parents[slot]].children.push(node);
            }
        }

        let mut root = built.swap_remove(0);
        root.children.reverse();
        root
    }
}

impl PartialEq for ProvenanceNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.asset != b.asset
                || a.attestations != b.attestations
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for ProvenanceNode {}

/// Lists child ids rather than descending into them.
impl fmt::Debug for ProvenanceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<AssetId> = self.children.iter().map(|c| c.asset.asset_id).collect();
        f.debug_struct("ProvenanceNode")
            .field("asset", &self.asset)
            .field("children", &children)
            .field("attestations", &self.attestations)
            .finish()
    }
}

// Lineage chains can be arbitrarily long; the derived drop glue would recurse
// once per generation.
impl Drop for ProvenanceNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Structural anomalies resolved while building a graph.
///
/// None of these are errors; they let callers see how much of the input
/// ended up unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDiagnostics {
    /// Non-root assets whose parent did not resolve, in indexing order.
    pub orphans: Vec<AssetId>,

    /// Attestations whose target asset was not indexed.
    pub dangling_attestations: usize,

    /// Identifiers that appeared more than once in the asset input.
    pub duplicate_ids: Vec<AssetId>,

    /// Assets whose parent link was dropped to break a cycle.
    pub broken_cycles: Vec<AssetId>,

    /// Nodes reachable from the root set.
    pub reachable_assets: usize,
}

impl GraphDiagnostics {
    /// True when every input record landed somewhere reachable.
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
            && self.dangling_attestations == 0
            && self.duplicate_ids.is_empty()
            && self.broken_cycles.is_empty()
    }
}

/// Summary counters, as shown on a dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub total_assets: usize,
    pub total_derivatives: usize,
    pub total_attestations: usize,
    pub max_depth: usize,
}

/// The reconstructed lineage forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceGraph {
    /// Every node whose parent id is zero, in indexing order.
    pub roots: Vec<ProvenanceNode>,

    /// Count of asset events in the input, reachable or not.
    pub total_assets: usize,

    /// Count of asset events with the derive action.
    pub total_derivatives: usize,

    /// Count of attestation events in the input, attached or not.
    pub total_attestations: usize,

    /// Longest root-to-leaf path in nodes; zero without roots.
    pub max_depth: usize,

    #[serde(default)]
    pub diagnostics: GraphDiagnostics,
}

impl ProvenanceGraph {
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics {
            total_assets: self.total_assets,
            total_derivatives: self.total_derivatives,
            total_attestations: self.total_attestations,
            max_depth: self.max_depth,
        }
    }

    /// Pre-order walk over every reachable node.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Look up a reachable node by asset id.
    pub fn find(&self, asset_id: AssetId) -> Option<&ProvenanceNode> {
        self.iter().find(|node| node.asset.asset_id == asset_id)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Pre-order iterator returned by [`ProvenanceGraph::iter`].
pub struct Nodes<'a> {
    stack: Vec<&'a ProvenanceNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a ProvenanceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
