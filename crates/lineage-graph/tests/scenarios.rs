//! Reconstruction scenarios over small registry histories.

use lineage_graph::build_graph;
use lineage_types::{
    Address, AssetAction, AssetEvent, AttestationEvent, ProvenanceNode, H256, U256,
};

fn asset(id: u64, parent: u64) -> AssetEvent {
    AssetEvent {
        asset_id: U256::from(id),
        parent_id: U256::from(parent),
        actor: Address::repeat_byte(0x10 + id as u8),
        action: if parent == 0 {
            AssetAction::Publish
        } else {
            AssetAction::Derive
        },
        recipe_hash: H256::repeat_byte(0xaa),
        recipe_uri: format!("ipfs://QmAsset{id}/metadata.json"),
        tx_hash: H256::from_low_u64_be(id),
        block_number: 1000 + id * 50,
    }
}

fn attest(id: u64, seq: u64) -> AttestationEvent {
    AttestationEvent {
        asset_id: U256::from(id),
        actor: Address::repeat_byte(0x70),
        claim_hash: H256::from_low_u64_be(seq),
        claim_uri: format!("ipfs://QmClaim{seq}"),
        tx_hash: H256::from_low_u64_be(900 + seq),
        block_number: 2000 + seq,
    }
}

fn ids(nodes: &[ProvenanceNode]) -> Vec<u64> {
    nodes.iter().map(|n| n.asset_id().as_u64()).collect()
}

fn claim_seqs(node: &ProvenanceNode) -> Vec<u64> {
    node.attestations
        .iter()
        .map(|a| a.claim_hash.to_low_u64_be())
        .collect()
}

#[test]
fn test_two_roots_with_derivatives_and_attestations() {
    let assets = vec![asset(1, 0), asset(2, 0), asset(3, 1), asset(4, 1), asset(5, 3)];
    let attestations = vec![attest(1, 1), attest(1, 2), attest(3, 3)];

    let graph = build_graph(&assets, &attestations);

    assert_eq!(graph.total_assets, 5);
    assert_eq!(graph.total_derivatives, 3);
    assert_eq!(graph.total_attestations, 3);
    assert_eq!(graph.max_depth, 3);

    assert_eq!(ids(&graph.roots), vec![1, 2]);
    let node1 = &graph.roots[0];
    assert_eq!(ids(&node1.children), vec![3, 4]);
    assert_eq!(claim_seqs(node1), vec![1, 2]);

    let node3 = &node1.children[0];
    assert_eq!(ids(&node3.children), vec![5]);
    assert_eq!(claim_seqs(node3), vec![3]);

    assert!(graph.roots[1].children.is_empty());
    assert!(graph.diagnostics.is_clean());
    assert_eq!(graph.diagnostics.reachable_assets, 5);
}

#[test]
fn test_orphan_is_counted_but_unreachable() {
    let graph = build_graph(&[asset(1, 0), asset(2, 99)], &[]);

    assert_eq!(ids(&graph.roots), vec![1]);
    assert!(graph.roots[0].children.is_empty());
    assert_eq!(graph.total_assets, 2);
    assert_eq!(graph.total_derivatives, 1);
    assert_eq!(graph.iter().count(), 1);
    assert_eq!(graph.diagnostics.orphans, vec![U256::from(2)]);
}

#[test]
fn test_orphan_subtree_does_not_count_toward_depth() {
    // 2 -> 3 -> 4 hangs off a missing parent.
    let graph = build_graph(
        &[asset(1, 0), asset(2, 99), asset(3, 2), asset(4, 3)],
        &[],
    );
    assert_eq!(graph.max_depth, 1);
    assert_eq!(graph.diagnostics.reachable_assets, 1);
    assert_eq!(graph.diagnostics.orphans, vec![U256::from(2)]);
}

#[test]
fn test_depth_of_chain_and_sibling_root() {
    let graph = build_graph(&[asset(1, 0), asset(3, 1), asset(5, 3), asset(2, 0)], &[]);
    assert_eq!(graph.max_depth, 3);
}

#[test]
fn test_depth_of_unrelated_roots() {
    let graph = build_graph(&[asset(1, 0), asset(2, 0)], &[]);
    assert_eq!(graph.max_depth, 1);
}

#[test]
fn test_empty_input() {
    let graph = build_graph(&[], &[]);
    assert_eq!(graph.max_depth, 0);
    assert_eq!(graph.total_assets, 0);
    assert!(graph.roots.is_empty());
}

#[test]
fn test_attestation_attached_exactly_once() {
    let graph = build_graph(&[asset(1, 0), asset(2, 1)], &[attest(2, 7), attest(8, 8)]);

    let attached: usize = graph.iter().map(|n| n.attestations.len()).sum();
    assert_eq!(attached, 1);
    assert_eq!(claim_seqs(graph.find(U256::from(2)).unwrap()), vec![7]);
    assert_eq!(graph.total_attestations, 2);
    assert_eq!(graph.diagnostics.dangling_attestations, 1);
}

#[test]
fn test_graph_serializes_for_presentation() {
    let graph = build_graph(&[asset(1, 0), asset(3, 1)], &[attest(1, 1)]);
    let json = serde_json::to_value(&graph).unwrap();

    assert_eq!(json["totalAssets"], 2);
    assert_eq!(json["maxDepth"], 2);
    assert_eq!(json["roots"][0]["action"], "publish");
    assert_eq!(json["roots"][0]["children"][0]["action"], "derive");
    assert_eq!(json["roots"][0]["attestations"][0]["claimURI"], "ipfs://QmClaim1");
}
