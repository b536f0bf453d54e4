//! `--json` output for graphs and scan reports.

use anyhow::Result;
use lineage_engine::GraphReport;
use lineage_fetch::{FetchReport, ScanBounds};
use lineage_graph::{flat_graph, FlatGraph};
use lineage_types::ProvenanceGraph;
use serde::Serialize;

/// Deepest graph still printed as nested `roots`/`children`.
///
/// Each generation adds two JSON levels, so anything deeper would trip the
/// 128-level recursion limit common to JSON readers (serde_json included).
/// Deeper graphs are printed as a pre-order `nodes` list with a `depth` on
/// each entry.
pub const NESTED_JSON_MAX_DEPTH: usize = 48;

#[derive(Serialize)]
#[serde(untagged)]
enum GraphJson<'a> {
    Nested(&'a ProvenanceGraph),
    Flat(FlatGraph<'a>),
}

impl<'a> GraphJson<'a> {
    fn new(graph: &'a ProvenanceGraph) -> Self {
        if graph.max_depth > NESTED_JSON_MAX_DEPTH {
            GraphJson::Flat(flat_graph(graph))
        } else {
            GraphJson::Nested(graph)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportJson<'a> {
    bounds: &'a ScanBounds,
    graph: GraphJson<'a>,
    assets: &'a FetchReport,
    attestations: &'a FetchReport,
    skipped_records: usize,
}

pub fn graph_json(graph: &ProvenanceGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&GraphJson::new(graph))?)
}

pub fn report_json(report: &GraphReport) -> Result<String> {
    let json = ReportJson {
        bounds: &report.bounds,
        graph: GraphJson::new(&report.graph),
        assets: &report.assets,
        attestations: &report.attestations,
        skipped_records: report.skipped_records,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_graph::build_graph;
    use lineage_types::{Address, AssetAction, AssetEvent, H256, U256};
    use serde_json::Value;

    fn chain(len: u64) -> ProvenanceGraph {
        let assets: Vec<AssetEvent> = (1..=len)
            .map(|id| AssetEvent {
                asset_id: U256::from(id),
                parent_id: U256::from(id - 1),
                actor: Address::repeat_byte(0x01),
                action: AssetAction::from(u8::from(id != 1)),
                recipe_hash: H256::zero(),
                recipe_uri: String::new(),
                tx_hash: H256::from_low_u64_be(id),
                block_number: id,
            })
            .collect();
        build_graph(&assets, &[])
    }

    #[test]
    fn test_shallow_graph_stays_nested() {
        let graph = chain(NESTED_JSON_MAX_DEPTH as u64);
        let json: Value = serde_json::from_str(&graph_json(&graph).unwrap()).unwrap();

        assert_eq!(json["roots"].as_array().unwrap().len(), 1);
        assert!(json.get("nodes").is_none());
        assert_eq!(json["maxDepth"], NESTED_JSON_MAX_DEPTH);
    }

    #[test]
    fn test_deep_graph_printed_flat() {
        let graph = chain(NESTED_JSON_MAX_DEPTH as u64 + 1);
        let json: Value = serde_json::from_str(&graph_json(&graph).unwrap()).unwrap();

        assert!(json.get("roots").is_none());
        let nodes = json["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), NESTED_JSON_MAX_DEPTH + 1);
        assert_eq!(nodes[0]["depth"], 1);
        assert_eq!(nodes[NESTED_JSON_MAX_DEPTH]["depth"], NESTED_JSON_MAX_DEPTH + 1);
    }

    #[test]
    fn test_very_long_chain_serializes() {
        let graph = chain(100_000);
        let text = graph_json(&graph).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["maxDepth"], 100_000);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 100_000);
    }
}
