//! Offline event dumps.

use anyhow::{Context, Result};
use camino::Utf8Path;
use lineage_graph::build_graph;
use lineage_types::{AssetEvent, AttestationEvent, ProvenanceGraph};
use serde::{Deserialize, Serialize};
use std::fs;

/// Decoded registry events saved as JSON:
///
/// ```json
/// { "assets": [ ... ], "attestations": [ ... ] }
/// ```
///
/// Records use the same camelCase shape as graph nodes, with ids as
/// `0x`-prefixed hex quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDump {
    #[serde(default)]
    pub assets: Vec<AssetEvent>,
    #[serde(default)]
    pub attestations: Vec<AttestationEvent>,
}

impl EventDump {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse event dump {path}"))
    }

    pub fn build(&self) -> ProvenanceGraph {
        build_graph(&self.assets, &self.attestations)
    }
}
