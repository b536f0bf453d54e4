//! Graph construction.
//!
//! Nodes live in an index-addressed arena while links are resolved, and are
//! only assembled into owned trees at the end. No pass recurses, so
//! arbitrarily long lineage chains are safe.

use lineage_types::{
    AssetEvent, AssetId, AttestationEvent, GraphDiagnostics, ProvenanceGraph, ProvenanceNode,
};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// How a slot attaches to the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Root,
    Child(usize),
    Orphan,
}

/// Build the provenance forest for `assets` and `attestations`.
///
/// - Slots follow the first occurrence of each asset id; a later duplicate
///   replaces the earlier event's data in place.
/// - An attestation attaches to the node with its asset id, or is dropped.
/// - A node with parent id zero is a root. Otherwise it becomes a child of
///   its parent, or an orphan when the parent is not indexed.
/// - A parent cycle is broken at the member indexed last, which becomes an
///   orphan.
///
/// Totals count the raw inputs, so unreachable records still show up in them.
pub fn build_graph(assets: &[AssetEvent], attestations: &[AttestationEvent]) -> ProvenanceGraph {
    let mut diagnostics = GraphDiagnostics::default();

    // 1. Index
    let mut index: HashMap<AssetId, usize> = HashMap::with_capacity(assets.len());
    let mut slots: Vec<Option<ProvenanceNode>> = Vec::with_capacity(assets.len());
    let mut seen_duplicates = HashSet::new();

    for asset in assets {
        match index.entry(asset.asset_id) {
            Entry::Occupied(slot) => {
                if let Some(node) = slots[*slot.get()].as_mut() {
                    node.asset = asset.clone();
                }
                if seen_duplicates.insert(asset.asset_id) {
                    diagnostics.duplicate_ids.push(asset.asset_id);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(slots.len());
                slots.push(Some(ProvenanceNode::new(asset.clone())));
            }
        }
    }

    // 2. Attestations
    for attestation in attestations {
        let target = index
            .get(&attestation.asset_id)
            .and_then(|&i| slots[i].as_mut());
        match target {
            Some(node) => node.attestations.push(attestation.clone()),
            None => diagnostics.dangling_attestations += 1,
        }
    }

    // 3. Links
    let mut links: Vec<Link> = slots
        .iter()
        .flatten()
        .map(|node| {
            if node.asset.is_root() {
                Link::Root
            } else {
                index
                    .get(&node.asset.parent_id)
                    .map_or(Link::Orphan, |&parent| Link::Child(parent))
            }
        })
        .collect();

    for broken in break_cycles(&mut links) {
        if let Some(node) = &slots[broken] {
            diagnostics.broken_cycles.push(node.asset_id());
        }
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    for (i, link) in links.iter().enumerate() {
        match *link {
            Link::Root => roots.push(i),
            Link::Child(parent) => children[parent].push(i),
            Link::Orphan => {
                if let Some(node) = &slots[i] {
                    diagnostics.orphans.push(node.asset_id());
                }
            }
        }
    }

    // 4. Materialize reachable trees, children before parents.
    let order = preorder(&roots, &children);
    diagnostics.reachable_assets = order.len();

    let mut depth = vec![0usize; slots.len()];
    for &i in order.iter().rev() {
        let Some(mut node) = slots[i].take() else {
            continue;
        };
        let mut node_depth = 1;
        for &child in &children[i] {
            node_depth = node_depth.max(depth[child] + 1);
            if let Some(built) = slots[child].take() {
                node.children.push(built);
            }
        }
        depth[i] = node_depth;
        slots[i] = Some(node);
    }

    // 5. Stats
    let max_depth = roots.iter().map(|&r| depth[r]).max().unwrap_or(0);
    let roots = roots.iter().filter_map(|&r| slots[r].take()).collect();

    ProvenanceGraph {
        roots,
        total_assets: assets.len(),
        total_derivatives: assets.iter().filter(|a| a.is_derivative()).count(),
        total_attestations: attestations.len(),
        max_depth,
        diagnostics,
    }
}

/// Cut every cycle in the parent relation, returning the slots turned into orphans.
///
/// Each slot has at most one parent, so following links from any start either
/// ends at a root/orphan, joins an already explored path, or closes exactly one
/// new cycle. The cycle member with the highest slot index loses its link.
fn break_cycles(links: &mut [Link]) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::New; links.len()];
    let mut broken = Vec::new();
    let mut path = Vec::new();

    for start in 0..links.len() {
        let mut current = start;
        path.clear();

        loop {
            match marks[current] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == current) {
                        if let Some(&last) = path[pos..].iter().max() {
                            links[last] = Link::Orphan;
                            broken.push(last);
                        }
                    }
                    break;
                }
                Mark::New => {
                    marks[current] = Mark::OnPath;
                    path.push(current);
                    match links[current] {
                        Link::Child(parent) => current = parent,
                        Link::Root | Link::Orphan => break,
                    }
                }
            }
        }

        for &p in &path {
            marks[p] = Mark::Done;
        }
    }

    broken
}

fn preorder(roots: &[usize], children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(children.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }
    order
}
