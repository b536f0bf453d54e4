//! Flat, depth-annotated listing of a graph for serialization.

use lineage_types::{AssetEvent, AttestationEvent, GraphDiagnostics, ProvenanceGraph};
use serde::Serialize;

/// One reachable asset without its subtree. The parent link is the asset's
/// own `parentId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNode<'a> {
    #[serde(flatten)]
    pub asset: &'a AssetEvent,

    /// 1 for roots.
    pub depth: usize,

    pub attestations: &'a [AttestationEvent],
}

/// A graph whose nodes are listed in pre-order instead of nested.
///
/// Serializes at constant nesting depth however long the lineage chains are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatGraph<'a> {
    pub nodes: Vec<FlatNode<'a>>,
    pub total_assets: usize,
    pub total_derivatives: usize,
    pub total_attestations: usize,
    pub max_depth: usize,
    pub diagnostics: &'a GraphDiagnostics,
}

/// List every reachable node of `graph` in pre-order with its depth.
pub fn flat_graph(graph: &ProvenanceGraph) -> FlatGraph<'_> {
    let mut nodes = Vec::new();
    let mut stack: Vec<_> = graph.roots.iter().rev().map(|node| (node, 1usize)).collect();

    while let Some((node, depth)) = stack.pop() {
        nodes.push(FlatNode {
            asset: &node.asset,
            depth,
            attestations: &node.attestations,
        });
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    FlatGraph {
        nodes,
        total_assets: graph.total_assets,
        total_derivatives: graph.total_derivatives,
        total_attestations: graph.total_attestations,
        max_depth: graph.max_depth,
        diagnostics: &graph.diagnostics,
    }
}
