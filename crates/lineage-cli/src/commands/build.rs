use anyhow::Result;
use camino::Utf8Path;
use tracing::info;

use crate::dump::EventDump;
use crate::json::graph_json;
use crate::render;

/// Handle `lineage build`.
pub fn cmd_build(events: &Utf8Path, json: bool) -> Result<()> {
    let dump = EventDump::load(events)?;
    info!(
        assets = dump.assets.len(),
        attestations = dump.attestations.len(),
        path = %events,
        "building graph from event dump"
    );
    let graph = dump.build();

    if json {
        println!("{}", graph_json(&graph)?);
    } else {
        print!("{}", render::render_graph(&graph));
    }
    Ok(())
}
